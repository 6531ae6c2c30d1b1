//! Minimal documents carrying the forms for the actions.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse},
};

const INDEX_HTML: &str = r#"<!doctype html>
<html lang="ru">
<head><meta charset="utf-8"><title>Profile</title></head>
<body>
<a href="/login">Войти</a> <a href="/register">Регистрация</a>
</body>
</html>"#;

const LOGIN_HTML: &str = r#"<!doctype html>
<html lang="ru">
<head><meta charset="utf-8"><title>Вход</title></head>
<body>
<form method="post" action="/login">
<input name="phone" type="tel" placeholder="Телефон">
<input name="email" type="email" placeholder="Почта">
<input name="password" type="password" placeholder="Пароль" required>
<button type="submit">Войти</button>
</form>
</body>
</html>"#;

const REGISTER_HTML: &str = r#"<!doctype html>
<html lang="ru">
<head><meta charset="utf-8"><title>Регистрация</title></head>
<body>
<form method="post" action="/register">
<input name="surname" placeholder="Фамилия" required>
<input name="name" placeholder="Имя" required>
<input name="phone" type="tel" placeholder="Телефон">
<input name="email" type="email" placeholder="Почта">
<input name="password" type="password" placeholder="Пароль" required>
<input name="second_password" type="password" placeholder="Повторите пароль" required>
<button type="submit">Зарегистрироваться</button>
</form>
</body>
</html>"#;

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn login_page() -> Html<&'static str> {
    Html(LOGIN_HTML)
}

pub async fn register_page() -> Html<&'static str> {
    Html(REGISTER_HTML)
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not found")
}

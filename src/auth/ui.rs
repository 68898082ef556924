use axum::response::Html;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;

use crate::shared::state::AppState;
use crate::shared::utils::render_page;

/// GET /auth
pub async fn login_page() -> Html<String> {
    let body = "\
<h2>Login</h2>\
<div class=\"card\">\
<input id=\"email\" type=\"email\" placeholder=\"Email\">\
<input id=\"password\" type=\"password\" placeholder=\"Password\">\
<button id=\"login\" onclick=\"login()\">Login</button>\
</div>\
<script>\
async function login() {\
  const button = document.getElementById('login');\
  button.disabled = true;\
  try {\
    const res = await fetch('/api/auth/login', {\
      method: 'POST',\
      headers: {'Content-Type': 'application/json'},\
      body: JSON.stringify({\
        email: document.getElementById('email').value,\
        password: document.getElementById('password').value\
      })\
    });\
    if (res.ok) { window.location = '/voice'; }\
    else { const data = await res.json(); alert(data.error || 'Login failed'); }\
  } finally { button.disabled = false; }\
}\
</script>";
    Html(render_page("Login", body))
}

pub fn configure_auth_ui_routes() -> Router<Arc<AppState>> {
    Router::new().route("/auth", get(login_page))
}

use axum::response::Html;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;

use crate::shared::state::AppState;
use crate::shared::utils::render_page;

/// GET /chat
///
/// The send button stays disabled while a turn is in flight; new input is
/// accepted once the chain completes or fails.
pub async fn chat_page() -> Html<String> {
    let body = "\
<h2>Support Chat</h2>\
<div id=\"chat-box\" class=\"card\" style=\"height:320px;overflow-y:auto;white-space:pre-line\">\
<p id=\"chat-hint\">Start typing your issue and hit Send...</p>\
</div>\
<div>\
<input id=\"message\" type=\"text\" placeholder=\"Type your issue here...\" \
onkeydown=\"if(event.key==='Enter')send()\">\
<button id=\"send\" onclick=\"send()\">Send</button>\
</div>\
<script>\
let sessionId = null;\
function show(sender, text) {\
  const hint = document.getElementById('chat-hint');\
  if (hint) hint.remove();\
  const div = document.createElement('div');\
  div.innerHTML = '<strong></strong>: ';\
  div.querySelector('strong').textContent = sender;\
  div.appendChild(document.createTextNode(text));\
  const box = document.getElementById('chat-box');\
  box.appendChild(div);\
  box.scrollTop = box.scrollHeight;\
}\
async function send() {\
  const input = document.getElementById('message');\
  const button = document.getElementById('send');\
  const message = input.value.trim();\
  if (!message) return;\
  show('You', message);\
  input.value = '';\
  button.disabled = true;\
  try {\
    const res = await fetch('/api/chat/messages', {\
      method: 'POST',\
      headers: {'Content-Type': 'application/json'},\
      body: JSON.stringify({session_id: sessionId, message})\
    });\
    const data = await res.json();\
    sessionId = data.session_id;\
    for (const msg of data.messages) show(msg.sender, msg.text);\
    if (data.error) alert(data.error);\
  } catch (err) {\
    show('Bot', 'Error while processing your request.');\
  } finally { button.disabled = false; }\
}\
</script>";
    Html(render_page("Support Chat", body))
}

pub fn configure_chat_ui_routes() -> Router<Arc<AppState>> {
    Router::new().route("/chat", get(chat_page))
}

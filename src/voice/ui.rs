use axum::response::Html;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;

use crate::shared::state::AppState;
use crate::shared::utils::render_page;

/// GET /voice
///
/// Speech capture runs in the browser; Stop ends transcript updates but an
/// in-flight classification call runs to completion.
pub async fn voice_page() -> Html<String> {
    let body = "\
<h2>Voice Complaint</h2>\
<div class=\"card\">\
<button id=\"start\" onclick=\"startRecording()\">Start</button> \
<button id=\"stop\" onclick=\"stopRecording()\" disabled>Stop</button>\
<p><label for=\"transcript\">Transcript</label></p>\
<textarea id=\"transcript\" rows=\"5\" placeholder=\"Your speech will appear here...\"></textarea>\
<button id=\"submit\" onclick=\"submitComplaint()\">Submit Complaint</button>\
<div id=\"summary\"></div>\
</div>\
<script>\
let recognition = null;\
function startRecording() {\
  const SpeechRecognition = window.SpeechRecognition || window.webkitSpeechRecognition;\
  if (!SpeechRecognition) { alert('Speech recognition is not supported in this browser.'); return; }\
  recognition = new SpeechRecognition();\
  recognition.lang = 'en-US';\
  recognition.interimResults = false;\
  recognition.onresult = (event) => {\
    document.getElementById('transcript').value = event.results[0][0].transcript;\
  };\
  recognition.start();\
  document.getElementById('start').disabled = true;\
  document.getElementById('stop').disabled = false;\
}\
function stopRecording() {\
  if (recognition) recognition.stop();\
  document.getElementById('start').disabled = false;\
  document.getElementById('stop').disabled = true;\
}\
function field(label, value) {\
  const p = document.createElement('p');\
  const b = document.createElement('strong');\
  b.textContent = label + ': ';\
  p.appendChild(b);\
  p.appendChild(document.createTextNode(value));\
  return p;\
}\
async function submitComplaint() {\
  stopRecording();\
  const button = document.getElementById('submit');\
  button.disabled = true;\
  button.textContent = 'Processing...';\
  try {\
    const res = await fetch('/api/voice/complaints', {\
      method: 'POST',\
      headers: {'Content-Type': 'application/json'},\
      body: JSON.stringify({transcript: document.getElementById('transcript').value})\
    });\
    const data = await res.json();\
    if (!res.ok) { alert(data.error || 'Could not submit the complaint.'); return; }\
    const summary = document.getElementById('summary');\
    summary.textContent = '';\
    summary.appendChild(field('Subject', data.subject));\
    summary.appendChild(field('Description', data.description));\
    summary.appendChild(field('Priority', data.priority));\
    summary.appendChild(field('Churn Risk', data.churn_risk));\
    summary.appendChild(field('ETA (hours)', data.eta_hours));\
    document.getElementById('transcript').value = '';\
    alert('Ticket submitted successfully!');\
  } finally {\
    button.disabled = false;\
    button.textContent = 'Submit Complaint';\
  }\
}\
</script>";
    Html(render_page("Voice Complaint", body))
}

pub fn configure_voice_ui_routes() -> Router<Arc<AppState>> {
    Router::new().route("/voice", get(voice_page))
}

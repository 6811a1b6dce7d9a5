//! Headless `--agent` mode: a blocking synchronous loop that reads JSON
//! commands from stdin and writes JSON responses to stdout.
//!
//! ## Protocol
//!
//! Each line of stdin is a JSON object with a `"cmd"` discriminator.
//! Each line of stdout is a JSON response with `"protocol_version"` and
//! `"type"` fields. See [`simulation::agent_protocol`] for the full schema.

use std::io::{BufRead, Write};
use std::path::Path;

use bevy::prelude::*;

use simulation::agent_protocol::{
    make_response, AgentCommand, AgentResponse, ResponsePayload, PROTOCOL_VERSION,
};
use simulation::directory::GameId;
use simulation::session_requests::{RequestSource, SessionOutcome, SessionRequest};

use crate::engine::{build_engine_app, submit};

pub fn run_agent_mode() {
    let mut app = build_engine_app();

    // -- I/O setup -----------------------------------------------------------
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut stdout = stdout.lock();

    // Send the "ready" message so the external program knows we are live.
    emit(&mut stdout, &make_response(ResponsePayload::Ready));
    info!("flood agent mode v{PROTOCOL_VERSION} ready, waiting for commands on stdin");

    // -- Main command loop ---------------------------------------------------
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                error!("stdin read error: {e}");
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let cmd: AgentCommand = match serde_json::from_str(&line) {
            Ok(c) => c,
            Err(e) => {
                let resp = make_response(ResponsePayload::Error {
                    message: format!("Parse error: {e}"),
                });
                emit(&mut stdout, &resp);
                continue;
            }
        };

        let response = process_command(cmd, &mut app);
        let is_goodbye = matches!(response.payload, ResponsePayload::Goodbye);

        emit(&mut stdout, &response);

        if is_goodbye {
            break;
        }
    }

    info!("flood agent mode shutting down");
}

fn emit(out: &mut impl Write, response: &AgentResponse) {
    match serde_json::to_string(response) {
        Ok(json) => {
            let _ = writeln!(out, "{json}");
            let _ = out.flush();
        }
        Err(e) => error!("failed to serialize response: {e}"),
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

fn process_command(cmd: AgentCommand, app: &mut App) -> AgentResponse {
    if let Some(request) = cmd.to_request() {
        let outcome = submit(app, RequestSource::Agent, request);
        return make_response(outcome.into());
    }

    match cmd {
        AgentCommand::SaveReplay { game_id, path } => {
            make_response(save_replay(app, game_id, Path::new(&path)))
        }

        AgentCommand::LoadReplay { path } => match save::read_replay(Path::new(&path)) {
            Ok(replay) => make_response(ResponsePayload::Replay { replay }),
            Err(e) => make_response(ResponsePayload::Error {
                message: e.to_string(),
            }),
        },

        AgentCommand::Quit => make_response(ResponsePayload::Goodbye),

        // Every other command maps to an engine request above.
        _ => make_response(ResponsePayload::Error {
            message: "Unsupported command".to_string(),
        }),
    }
}

fn save_replay(app: &mut App, game_id: GameId, path: &Path) -> ResponsePayload {
    let replay = match submit(app, RequestSource::Agent, SessionRequest::Replay { game_id }) {
        SessionOutcome::Replay(replay) => replay,
        other => return other.into(),
    };
    match save::write_replay(path, &replay) {
        Ok(_) => ResponsePayload::Ok,
        Err(e) => ResponsePayload::Error {
            message: e.to_string(),
        },
    }
}

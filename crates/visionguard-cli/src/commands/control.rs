//! Commands that talk to a running daemon.

use visionguard_core::{Phase, StatusSnapshot};

use super::CommandResult;
use crate::ipc::{Client, ClientError, Request, Response};

fn expect_ack(response: Response) -> Result<(), ClientError> {
    match response {
        Response::Ack => Ok(()),
        other => Err(ClientError::Unexpected(other)),
    }
}

pub fn status() -> CommandResult {
    let mut client = Client::connect_default()?;
    match client.call(&Request::GetStatus)? {
        Response::Status { status } => {
            println!("{}", serde_json::to_string_pretty(&status)?);
            Ok(())
        }
        other => Err(ClientError::Unexpected(other).into()),
    }
}

pub fn watch() -> CommandResult {
    let mut client = Client::connect_default()?;
    client.send(&Request::Subscribe)?;
    loop {
        match client.receive() {
            Ok(Response::Status { status }) => println!("{}", status_line(&status)),
            Ok(Response::Error { message }) => return Err(ClientError::Daemon(message).into()),
            Ok(other) => return Err(ClientError::Unexpected(other).into()),
            Err(ClientError::Closed) => {
                eprintln!("daemon stopped");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        }
    }
}

pub fn skip() -> CommandResult {
    let mut client = Client::connect_default()?;
    expect_ack(client.call(&Request::SkipBreak)?)?;
    println!("ok");
    Ok(())
}

pub fn start() -> CommandResult {
    let mut client = Client::connect_default()?;
    expect_ack(client.call(&Request::Activate)?)?;
    println!("ok");
    Ok(())
}

pub fn quit() -> CommandResult {
    let mut client = Client::connect_default()?;
    expect_ack(client.call(&Request::Quit)?)?;
    println!("visionguard stopped");
    Ok(())
}

pub(crate) fn status_line(status: &StatusSnapshot) -> String {
    let label = match status.phase {
        Phase::Working => "working",
        Phase::OnBreak => "on break",
    };
    format!(
        "{label:<8} {} remaining ({:.0}%)",
        status.remaining_clock(),
        status.progress() * 100.0
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_line_shows_phase_clock_and_progress() {
        let status = StatusSnapshot {
            seconds_remaining: 600,
            phase: Phase::Working,
            phase_total_seconds: 1200,
        };
        assert_eq!(status_line(&status), "working  10:00 remaining (50%)");

        let status = StatusSnapshot {
            seconds_remaining: 5,
            phase: Phase::OnBreak,
            phase_total_seconds: 20,
        };
        assert_eq!(status_line(&status), "on break 00:05 remaining (75%)");
    }
}

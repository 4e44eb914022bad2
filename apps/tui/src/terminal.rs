//! Terminal setup and teardown around a console session.

use std::future::Future;
use std::io::{Stdout, stdout};

use anyhow::Result;
use crossterm::{
    ExecutableCommand, cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;

pub type ConsoleTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Raw mode, alternate screen and mouse capture.
pub fn setup() -> Result<ConsoleTerminal> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(EnableMouseCapture)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout()))?)
}

/// Undoes [`setup`]; safe to call after a partial setup.
pub fn restore() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(DisableMouseCapture)?;
    stdout().execute(LeaveAlternateScreen)?;
    stdout().execute(cursor::Show)?;
    Ok(())
}

/// Runs `session` on whatever `setup` produced, then always runs `restore`,
/// including when `setup` itself failed. The first error is returned.
pub async fn guarded<T, Fut>(
    setup: impl FnOnce() -> Result<T>,
    session: impl FnOnce(T) -> Fut,
    restore: impl FnOnce() -> Result<()>,
) -> Result<()>
where
    Fut: Future<Output = Result<()>>,
{
    let result = match setup() {
        Ok(terminal) => session(terminal).await,
        Err(e) => Err(e),
    };
    let restored = restore();
    result?;
    restored
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[tokio::test]
    async fn test_restore_runs_when_setup_fails() {
        let restored = Cell::new(0);
        let ran = Cell::new(false);
        let result = guarded(
            || -> Result<()> { Err(anyhow::anyhow!("no tty")) },
            |()| async {
                ran.set(true);
                Ok(())
            },
            || {
                restored.set(restored.get() + 1);
                Ok(())
            },
        )
        .await;

        assert_eq!(result.unwrap_err().to_string(), "no tty");
        assert!(!ran.get());
        assert_eq!(restored.get(), 1);
    }

    #[tokio::test]
    async fn test_session_error_wins_over_restore_error() {
        let restored = Cell::new(false);
        let result = guarded(
            || Ok(7),
            |value| async move {
                assert_eq!(value, 7);
                Err(anyhow::anyhow!("loop failed"))
            },
            || {
                restored.set(true);
                Err(anyhow::anyhow!("restore failed"))
            },
        )
        .await;

        assert_eq!(result.unwrap_err().to_string(), "loop failed");
        assert!(restored.get());
    }

    #[tokio::test]
    async fn test_restore_error_surfaces_after_clean_session() {
        let result = guarded(|| Ok(()), |()| async { Ok(()) }, || Err(anyhow::anyhow!("restore failed"))).await;
        assert_eq!(result.unwrap_err().to_string(), "restore failed");
    }
}

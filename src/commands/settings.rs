//! Theme and layout settings

use super::Session;
use crate::cli::ThemeCommand;
use crate::error::Result;
use crate::store::ViewMode;
use colored::Colorize;

fn theme_name(is_dark_mode: bool) -> &'static str {
    if is_dark_mode {
        "dark"
    } else {
        "light"
    }
}

pub async fn theme(session: &Session, command: ThemeCommand) -> Result<()> {
    let mut store = session.store().lock().await;
    match command {
        ThemeCommand::Toggle => {
            let dark = store.toggle_dark_mode();
            println!("{}", format!("Theme set to {}", theme_name(dark)).green());
        }
        ThemeCommand::Show => println!("{}", theme_name(store.is_dark_mode())),
    }
    Ok(())
}

pub async fn view(session: &Session, mode: ViewMode) -> Result<()> {
    session.store().lock().await.set_view_mode(mode);
    println!("{}", format!("View set to {}", mode).green());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::memory_session;
    use super::*;
    use crate::persistence::Persistence;

    #[tokio::test]
    async fn test_toggle_theme_twice_restores_light() {
        let (session, _) = memory_session();
        theme(&session, ThemeCommand::Toggle).await.unwrap();
        assert!(session.store().lock().await.is_dark_mode());
        theme(&session, ThemeCommand::Toggle).await.unwrap();
        assert!(!session.store().lock().await.is_dark_mode());
    }

    #[tokio::test]
    async fn test_view_mode_is_persisted() {
        let (session, backend) = memory_session();
        view(&session, ViewMode::Grid).await.unwrap();
        session.close().await.unwrap();

        assert_eq!(backend.load().unwrap().unwrap().view_mode, ViewMode::Grid);
    }
}

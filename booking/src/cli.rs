//! Interactive terminal page
//!
//! Reads one command per line, sends the matching action, waits for the
//! store to settle and prints the page again.

use crate::app::{BookingAction, BookingStore, PageView};
use crate::types::EventId;
use std::io::Write;
use std::str::FromStr;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Help text
pub const HELP: &str = "\
Commandes :
  reserver <n>     réserver une place pour l'événement n
  nom <texte>      nom du nouvel événement (propriétaire)
  capacite <n>     capacité du nouvel événement (propriétaire)
  creer            créer l'événement (propriétaire)
  actualiser       recharger la liste
  connecter        se connecter au portefeuille
  ok               fermer le message
  aide             afficher cette aide
  quitter          quitter";

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `reserver <n>`
    Reserve(EventId),
    /// `nom <texte>`
    Name(String),
    /// `capacite <n>`, kept as typed
    Capacity(String),
    /// `creer`
    Create,
    /// `actualiser`
    Refresh,
    /// `connecter`
    Connect,
    /// `ok`
    Dismiss,
    /// `aide`
    Help,
    /// `quitter`
    Quit,
}

/// Unrecognised input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Blank line
    #[error("commande vide")]
    Empty,
    /// Unknown verb
    #[error("commande inconnue : {0} (tapez « aide »)")]
    Unknown(String),
    /// `reserver` without a valid event number
    #[error("numéro d'événement invalide : {0}")]
    InvalidEventId(String),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(verb, rest)| (verb, rest.trim()));

        match verb.to_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            "reserver" | "réserver" | "reserve" => rest
                .parse()
                .map(Self::Reserve)
                .map_err(|_| CommandError::InvalidEventId(rest.to_string())),
            "nom" => Ok(Self::Name(rest.to_string())),
            "capacite" | "capacité" => Ok(Self::Capacity(rest.to_string())),
            "creer" | "créer" => Ok(Self::Create),
            "actualiser" => Ok(Self::Refresh),
            "connecter" => Ok(Self::Connect),
            "ok" => Ok(Self::Dismiss),
            "aide" | "help" | "?" => Ok(Self::Help),
            "quitter" | "quit" | "q" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

impl Command {
    /// Action sent to the store, if any
    #[must_use]
    pub fn into_action(self) -> Option<BookingAction> {
        match self {
            Self::Reserve(event_id) => Some(BookingAction::Reserve { event_id }),
            Self::Name(name) => Some(BookingAction::DraftNameChanged { name }),
            Self::Capacity(capacity) => Some(BookingAction::DraftCapacityChanged { capacity }),
            Self::Create => Some(BookingAction::SubmitDraft),
            Self::Refresh => Some(BookingAction::Refresh),
            Self::Connect => Some(BookingAction::Connect),
            Self::Dismiss => Some(BookingAction::DismissNotice),
            Self::Help | Self::Quit => None,
        }
    }
}

async fn render<W: Write>(store: &BookingStore, output: &mut W) -> std::io::Result<()> {
    let page = store.state(PageView::from_state).await;
    writeln!(output, "{page}")?;
    output.flush()
}

/// Run the page until `quitter` or end of input.
///
/// # Errors
///
/// Reading input or writing output failed.
pub async fn run<R, W>(store: &BookingStore, input: R, mut output: W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    render(store, &mut output).await?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        match line.parse::<Command>() {
            Ok(Command::Quit) => break,
            Ok(Command::Help) => writeln!(output, "{HELP}")?,
            Ok(command) => {
                if let Some(action) = command.into_action() {
                    store.send(action).await;
                    store.settle().await;
                }
                render(store, &mut output).await?;
            },
            Err(CommandError::Empty) => {},
            Err(error) => writeln!(output, "{error}")?,
        }
    }

    Ok(())
}

//! What the page shows, derived from [`BookingState`]

use super::state::{BookingState, ConnectionPhase, PendingTransaction};
use crate::types::{EventId, EventRecord, Notice, NoticeLevel};
use std::fmt;

/// Reserve button of one event card
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReserveButton {
    /// "Déjà réservé", "Complet" or "Réserver"
    pub label: &'static str,
    /// Clicking does nothing
    pub disabled: bool,
}

/// One event in the list
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventCard {
    /// Contract index, used by the `reserve` command
    pub id: EventId,
    /// Event name
    pub name: String,
    /// Total seats
    pub capacity: u64,
    /// Seats left
    pub remaining_seats: u64,
    /// Reserve button
    pub button: ReserveButton,
}

impl EventCard {
    fn new(event: &EventRecord, transaction_pending: bool) -> Self {
        let availability = event.availability();
        Self {
            id: event.id,
            name: event.name.clone(),
            capacity: event.capacity,
            remaining_seats: event.remaining_seats(),
            button: ReserveButton {
                label: availability.label(),
                disabled: !availability.can_reserve() || transaction_pending,
            },
        }
    }
}

/// Creation form, shown to the owner only
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateForm {
    /// Name field
    pub name: String,
    /// Capacity field
    pub capacity: String,
    /// Submit disabled while a transaction is pending
    pub submit_disabled: bool,
}

/// The rendered page
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageView {
    /// Connected account, `None` shows "Aucun"
    pub account: Option<String>,
    /// Admin badge
    pub is_owner: bool,
    /// Creation form, present iff the account owns the contract
    pub create_form: Option<CreateForm>,
    /// Event cards in index order
    pub events: Vec<EventCard>,
    /// Modal notice
    pub notice: Option<Notice>,
    /// Progress line
    pub status: Option<&'static str>,
    /// Last refresh, `HH:MM:SS` UTC
    pub loaded_at: Option<String>,
}

impl PageView {
    /// Build the page for `state`
    #[must_use]
    pub fn from_state(state: &BookingState) -> Self {
        let transaction_pending = state.pending_transaction.is_some();
        let is_owner = state.is_owner();

        let status = match (state.phase, state.pending_transaction) {
            (ConnectionPhase::Connecting, _) => Some("Connexion au portefeuille…"),
            (_, Some(PendingTransaction::Reserve(_))) => Some("Réservation en cours…"),
            (_, Some(PendingTransaction::CreateEvent)) => Some("Création en cours…"),
            _ if state.loading => Some("Chargement des événements…"),
            _ => None,
        };

        Self {
            account: state.session.as_ref().map(|s| s.account.to_string()),
            is_owner,
            create_form: is_owner.then(|| CreateForm {
                name: state.draft.name.clone(),
                capacity: state.draft.capacity.clone(),
                submit_disabled: transaction_pending,
            }),
            events: state
                .events
                .iter()
                .map(|event| EventCard::new(event, transaction_pending))
                .collect(),
            notice: state.notice.clone(),
            status,
            loaded_at: state
                .loaded_at
                .map(|at| at.format("%H:%M:%S").to_string()),
        }
    }
}

impl fmt::Display for PageView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Connecté en tant que : {}",
            self.account.as_deref().unwrap_or("Aucun")
        )?;
        if self.is_owner {
            write!(f, " (administrateur)")?;
        }
        writeln!(f)?;

        if let Some(form) = &self.create_form {
            writeln!(f)?;
            writeln!(f, "Créer un événement :")?;
            writeln!(f, "  Nom : {}", form.name)?;
            writeln!(f, "  Capacité : {}", form.capacity)?;
            let submit = if form.submit_disabled { "indisponible" } else { "creer" };
            writeln!(f, "  [{submit}]")?;
        }

        writeln!(f)?;
        writeln!(f, "Événements disponibles :")?;
        if self.events.is_empty() {
            writeln!(f, "Aucun événement trouvé.")?;
        }
        for card in &self.events {
            writeln!(f, "  #{} {}", card.id, card.name)?;
            writeln!(f, "     Capacité : {}", card.capacity)?;
            writeln!(f, "     Places restantes : {}", card.remaining_seats)?;
            if card.button.disabled {
                writeln!(f, "     ({})", card.button.label)?;
            } else {
                writeln!(f, "     [{}]", card.button.label)?;
            }
        }

        if let Some(status) = self.status {
            writeln!(f)?;
            writeln!(f, "{status}")?;
        }
        if let Some(at) = &self.loaded_at {
            writeln!(f, "Mis à jour à {at} UTC")?;
        }

        if let Some(notice) = &self.notice {
            let marker = match notice.level {
                NoticeLevel::Info => "i",
                NoticeLevel::Error => "!",
            };
            writeln!(f)?;
            writeln!(f, "[{marker}] {}", notice.message)?;
            writeln!(f, "    (tapez « ok » pour fermer)")?;
        }

        Ok(())
    }
}

//! Dependencies injected into the booking reducer

use crate::loader::LoadStrategy;
use crate::wallet::WalletProvider;
use alloy::primitives::Address;
use seatbook_core::environment::Clock;
use std::sync::Arc;

/// Environment for [`super::BookingReducer`]
#[derive(Clone)]
pub struct BookingEnvironment {
    /// Wallet, `None` when none is installed
    pub wallet: Option<Arc<dyn WalletProvider>>,
    /// Deployed `EventBooking` address
    pub contract_address: Address,
    /// How the loader issues reads
    pub load_strategy: LoadStrategy,
    /// Time source for `loaded_at`
    pub clock: Arc<dyn Clock>,
}

impl BookingEnvironment {
    /// Create a new environment
    #[must_use]
    pub fn new(
        wallet: Option<Arc<dyn WalletProvider>>,
        contract_address: Address,
        load_strategy: LoadStrategy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            wallet,
            contract_address,
            load_strategy,
            clock,
        }
    }
}

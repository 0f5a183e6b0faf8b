//! Request dispatch.
//!
//! Each handler either commits its whole change or fails without one.
//! Operations on accounts require an unlocked session; `get_state`,
//! `logout`, `unlock`, wallet creation and network changes do not.

use bearby_crypto::mnemonic::generate_mnemonic;
use bearby_types::Result;
use bearby_wallet::ledger::seed_account;

use crate::command::{Request, Response};
use crate::state::BackgroundState;

impl BackgroundState {
    /// Runs one request to completion.
    ///
    /// # Errors
    ///
    /// Whatever the underlying component reports; see [`bearby_types::BearbyError`].
    pub fn handle(&mut self, request: Request) -> Result<Response> {
        match request {
            Request::RandomWords { strength } => {
                let mnemonic = generate_mnemonic(strength)?;
                Ok(Response::Words(mnemonic.as_str().to_string()))
            }
            Request::CreateWallet {
                words,
                password,
                name,
            } => self.create_wallet(&words, &password, &name),
            Request::Unlock { password } => {
                self.guard.unlock(&password)?;
                Ok(self.state())
            }
            Request::Logout => {
                self.guard.logout();
                Ok(self.state())
            }
            Request::GetState => Ok(self.state()),

            // -- Accounts -------------------------------------------------
            Request::CreateAccount { name } => {
                self.ledger.add_account_from_seed(&self.guard, &name)?;
                Ok(self.state())
            }
            Request::RestoreKey { key, name } => {
                self.ledger
                    .add_account_from_private_key(&self.guard, &key, &name)?;
                Ok(self.state())
            }
            Request::SelectAccount { position } => {
                self.guard.check_session()?;
                self.ledger.select(position)?;
                Ok(self.state())
            }
            Request::RemoveAccount => {
                self.guard.check_session()?;
                let selected = self.ledger.wallet().selected_address;
                self.ledger.remove(selected)?;
                Ok(self.state())
            }
            Request::SetAccountName { position, name } => {
                self.ledger.change_account_name(&self.guard, position, &name)?;
                Ok(self.state())
            }
            Request::UpdateBalances { balances } => {
                self.ledger.update_balance(&self.guard, &balances)?;
                Ok(self.state())
            }
            Request::ExportPrivateKey { position } => {
                let key = self.ledger.export_private_key(&self.guard, position)?;
                Ok(Response::PrivateKey(key))
            }

            // -- Network --------------------------------------------------
            Request::SelectNetwork { name } => {
                self.network.set_network(&name)?;
                Ok(self.state())
            }
            Request::GetNetworkConfig => Ok(Response::NetworkConfig(self.network.config().clone())),
            Request::SetNetworkConfig { config } => {
                self.network.set_config(config)?;
                Ok(self.state())
            }
            Request::SetNodesCount { count } => {
                self.network.set_nodes_count(count)?;
                Ok(self.state())
            }
            Request::AddNode { endpoint } => {
                self.network.add_node(&endpoint)?;
                Ok(self.state())
            }
            Request::RemoveNode { endpoint } => {
                self.network.remove_node(&endpoint)?;
                Ok(self.state())
            }
            Request::SortNodes { order } => {
                self.network.sort_nodes(&order)?;
                Ok(self.state())
            }
            Request::DowngradeNode { endpoint } => {
                self.network.downgrade_node_status(&endpoint)?;
                Ok(self.state())
            }

            Request::Reset => {
                self.ledger.reset()?;
                self.guard.reset()?;
                tracing::info!("wallet reset");
                Ok(self.state())
            }
        }
    }

    fn state(&self) -> Response {
        Response::State(self.snapshot())
    }

    /// Replaces any previous wallet with one built from `words`.
    ///
    /// The seed, the sealed vault and account 0 are all computed before
    /// storage is touched. The vault is written first and the ledger
    /// second; a failed ledger write puts the old vault back.
    fn create_wallet(&mut self, words: &str, password: &str, name: &str) -> Result<Response> {
        let setup = self.guard.prepare_vault(words, password)?;
        let first = seed_account(setup.seed(), 0, name)?;

        let rollback = self.guard.commit_vault(setup)?;
        let account = match self.ledger.start_over(first) {
            Ok(account) => account,
            Err(e) => {
                self.guard.rollback(rollback);
                return Err(e);
            }
        };

        tracing::info!(address = %account.address, "wallet created");
        Ok(self.state())
    }
}

use crate::error::Result;
use crate::types::Account;
use crate::OcmClient;

impl OcmClient {
    /// Account of the logged in user
    pub async fn get_current_account(&self) -> Result<Account> {
        self.get("/api/accounts_mgmt/v1/current_account").await
    }
}

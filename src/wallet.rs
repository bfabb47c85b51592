//! Wallet session: holds the connected account address and supplies it to
//! every command that acts on behalf of a wallet.

use anyhow::{anyhow, Result};

/// EVM address check: `0x` plus 40 hex digits.
pub fn is_valid_address(address: &str) -> bool {
    let Some(hex) = address.strip_prefix("0x") else {
        return false;
    };
    hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit())
}

#[derive(Debug, Default, Clone)]
pub struct WalletSession {
    address: Option<String>,
}

impl WalletSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect an address. Stored lowercased so wallet comparisons are
    /// case-insensitive.
    pub fn connect(&mut self, address: &str) -> Result<()> {
        if !is_valid_address(address) {
            return Err(anyhow!(
                "Invalid wallet address '{address}'. Expected 0x followed by 40 hex characters"
            ));
        }
        let address = address.to_lowercase();
        log::info!("[wallet] Connected {address}");
        self.address = Some(address);
        Ok(())
    }

    pub fn disconnect(&mut self) {
        if let Some(address) = self.address.take() {
            log::info!("[wallet] Disconnected {address}");
        }
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn is_connected(&self) -> bool {
        self.address.is_some()
    }

    /// The connected address, or an error for commands that need one.
    pub fn require(&self) -> Result<&str> {
        self.address
            .as_deref()
            .ok_or_else(|| anyhow!("No wallet connected. Pass --wallet-address or set WALLET_ADDRESS"))
    }
}

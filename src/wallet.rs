use alloy::signers::local::{LocalSigner, PrivateKeySigner};
use eyre::{Context, Result};
use std::fs;

use crate::config::PrivateKey;

impl PrivateKey {
    /// The local signer to deploy with, if any was configured.
    ///
    /// `None` means transactions are signed by the node's unlocked accounts.
    pub fn wallet(&self) -> Result<Option<PrivateKeySigner>> {
        if let Some(key) = &self.private_key {
            return Ok(Some(key.trim().parse::<PrivateKeySigner>()?));
        }

        if let Some(file) = &self.private_key_path {
            let key = fs::read_to_string(file).wrap_err("could not open private key file")?;
            return Ok(Some(key.trim().parse::<PrivateKeySigner>()?));
        }

        let Some(keystore) = &self.keystore_path else {
            return Ok(None);
        };
        let password = self
            .keystore_password_path
            .as_ref()
            .map(fs::read_to_string)
            .unwrap_or(Ok("".into()))
            .wrap_err("could not read keystore password file")?;

        LocalSigner::decrypt_keystore(keystore, password.trim())
            .map(Some)
            .wrap_err("could not decrypt keystore")
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use alloy::primitives::address;

    use crate::config::PrivateKey;

    // First account of a default development node mnemonic.
    const KEY: &str = "0x4f3edf983ac636a65a842ce7c78d9aa706d3b113bce9c46f30d7d21715b23b1d";

    #[test]
    fn no_credentials_means_node_accounts() {
        let auth = PrivateKey::default();
        assert!(auth.wallet().unwrap().is_none());
    }

    #[test]
    fn parses_inline_private_key() {
        let auth = PrivateKey {
            private_key: Some(KEY.to_owned()),
            ..Default::default()
        };
        let signer = auth.wallet().unwrap().unwrap();
        assert_eq!(
            signer.address(),
            address!("90F8bf6A479f320ead074411a4B0e7944Ea8c9C1")
        );
    }

    #[test]
    fn reads_private_key_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key");
        fs::write(&path, format!("{KEY}\n")).unwrap();

        let auth = PrivateKey {
            private_key_path: Some(path),
            ..Default::default()
        };
        assert!(auth.wallet().unwrap().is_some());
    }

    #[test]
    fn rejects_malformed_private_key() {
        let auth = PrivateKey {
            private_key: Some("0xnothex".to_owned()),
            ..Default::default()
        };
        assert!(auth.wallet().is_err());
    }
}

//! Secret-hash binding required by app clients that carry a client secret.
//!
//! Every user-pool call made on behalf of a username carries
//! `Base64(HMAC-SHA256(key = client_secret, message = username || client_id))`. The provider
//! recomputes the same value and rejects the call on mismatch, so the construction must stay
//! byte-for-byte identical: no separator, the secret as the key, standard padded Base64.

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use sha2::Sha256;
// self
use crate::{
	_prelude::*,
	auth::{ClientId, Secret, Username},
	error::ConfigError,
};

type HmacSha256 = Hmac<Sha256>;

/// Per-call integrity tag bound to a username.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SecretHash(String);
impl SecretHash {
	/// Returns the Base64 tag.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for SecretHash {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Display for SecretHash {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

/// Computes the secret hash for `username` without keeping any state around.
pub fn compute_tag(
	username: &Username,
	client_id: &ClientId,
	client_secret: &Secret,
) -> Result<SecretHash, ConfigError> {
	let mac = HmacSha256::new_from_slice(client_secret.expose().as_bytes())
		.map_err(|_| ConfigError::InvalidSecretKey)?;

	Ok(finalize(mac, username, client_id))
}

/// Binds usernames to the app client credentials.
///
/// The binder keys the MAC once at construction so a missing or unusable client secret fails
/// at startup; each [`compute_tag`](SecretBinder::compute_tag) call clones the keyed state and
/// recomputes the tag from scratch.
#[derive(Clone)]
pub struct SecretBinder {
	client_id: ClientId,
	keyed: HmacSha256,
}
impl SecretBinder {
	/// Creates a binder for the app client.
	pub fn new(client_id: ClientId, client_secret: Secret) -> Result<Self, ConfigError> {
		if client_secret.is_empty() {
			return Err(ConfigError::MissingValue { name: "client_secret" });
		}

		let keyed = HmacSha256::new_from_slice(client_secret.expose().as_bytes())
			.map_err(|_| ConfigError::InvalidSecretKey)?;

		Ok(Self { client_id, keyed })
	}

	/// App client identifier mixed into every tag.
	pub fn client_id(&self) -> &ClientId {
		&self.client_id
	}

	/// Derives the tag for `username`.
	pub fn compute_tag(&self, username: &Username) -> SecretHash {
		finalize(self.keyed.clone(), username, &self.client_id)
	}
}
impl Debug for SecretBinder {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SecretBinder")
			.field("client_id", &self.client_id)
			.field("client_secret", &"<redacted>")
			.finish()
	}
}

fn finalize(mut mac: HmacSha256, username: &Username, client_id: &ClientId) -> SecretHash {
	mac.update(username.as_bytes());
	mac.update(client_id.as_bytes());

	SecretHash(STANDARD.encode(mac.finalize().into_bytes()))
}

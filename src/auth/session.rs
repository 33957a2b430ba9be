//! Session tokens issued after a successful sign-in.

// self
use crate::{_prelude::*, auth::Secret};

/// Bearer credentials issued by the identity provider and handed to the caller.
///
/// The gateway keeps no copy; the value lives only as long as the response being built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
	/// Access token for resource servers.
	pub access_token: Secret,
	/// OpenID Connect identity token.
	pub id_token: Secret,
	/// Refresh token for later renewal.
	pub refresh_token: Secret,
}

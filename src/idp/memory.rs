//! Thread-safe in-memory [`IdentityProviderClient`] for local development and tests.
//!
//! The pool mirrors the user-pool rules the gateway depends on: it verifies the secret
//! hash on every call, keeps identities pending until confirmed, refuses sign-in for
//! unconfirmed identities, and reports failures with the provider's wording.

// self
use crate::{
	_prelude::*,
	auth::{Secret, SecretBinder, SecretHash, Username},
	idp::{
		AuthenticationResult, CodeDeliveryDetails, ConfirmSignUpOutput, IdentityProviderClient,
		IdentityState, InitiateAuthOutput, ProviderFuture, SignUpOutput, UserAttribute,
	},
	provider::{ProviderErrorKind, ProviderOperation},
};

type UserMap = Arc<RwLock<HashMap<Username, PoolUser>>>;

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Clone, Debug)]
struct PoolUser {
	password: Secret,
	attributes: Vec<UserAttribute>,
	state: IdentityState,
	code: String,
	sub: String,
}

#[derive(Debug, Default)]
struct PoolCounters {
	issued: u64,
	calls: HashMap<ProviderOperation, usize>,
}

/// In-process user pool keyed by the same app client credentials as the gateway.
#[derive(Clone, Debug)]
pub struct MemoryIdentityProvider {
	binder: SecretBinder,
	auto_confirm: bool,
	users: UserMap,
	counters: Arc<Mutex<PoolCounters>>,
}
impl MemoryIdentityProvider {
	/// Creates an empty pool that verifies tags with `binder`.
	pub fn new(binder: SecretBinder) -> Self {
		Self { binder, auto_confirm: false, users: Default::default(), counters: Default::default() }
	}

	/// Confirms identities at registration time, like pools with auto-verification enabled.
	pub fn with_auto_confirm(mut self) -> Self {
		self.auto_confirm = true;

		self
	}

	/// Number of calls received for `operation`, including rejected ones.
	pub fn calls(&self, operation: ProviderOperation) -> usize {
		self.counters.lock().calls.get(&operation).copied().unwrap_or(0)
	}

	/// Confirmation code delivered out-of-band to a pending identity.
	pub fn pending_code(&self, username: &str) -> Option<String> {
		self.users
			.read()
			.get(username)
			.filter(|user| user.state == IdentityState::PendingConfirmation)
			.map(|user| user.code.clone())
	}

	/// Lifecycle state of `username`, if registered.
	pub fn state(&self, username: &str) -> Option<IdentityState> {
		self.users.read().get(username).map(|user| user.state)
	}

	/// Attributes stored for `username`, if registered.
	pub fn attributes(&self, username: &str) -> Option<Vec<UserAttribute>> {
		self.users.read().get(username).map(|user| user.attributes.clone())
	}

	fn enter(&self, operation: ProviderOperation, username: &Username, secret_hash: &SecretHash) -> Result<u64> {
		let mut counters = self.counters.lock();

		*counters.calls.entry(operation).or_default() += 1;

		if self.binder.compute_tag(username) != *secret_hash {
			return Err(Error::rejected(
				ProviderErrorKind::InvalidClient,
				format!("Unable to verify secret hash for client {}", self.binder.client_id()),
			));
		}

		counters.issued += 1;

		Ok(counters.issued)
	}

	fn register_now(
		&self,
		username: &Username,
		password: &Secret,
		attributes: &[UserAttribute],
		secret_hash: &SecretHash,
	) -> Result<SignUpOutput> {
		let seq = self.enter(ProviderOperation::Register, username, secret_hash)?;

		if password.expose().chars().count() < MIN_PASSWORD_LEN {
			return Err(Error::rejected(
				ProviderErrorKind::InvalidRequest,
				"Password did not conform with policy: Password not long enough",
			));
		}

		let mut users = self.users.write();

		if users.contains_key(username) {
			return Err(Error::rejected(ProviderErrorKind::InvalidRequest, "User already exists"));
		}

		let state =
			if self.auto_confirm { IdentityState::Confirmed } else { IdentityState::PendingConfirmation };
		let sub = format!("memory-sub-{seq:08}");
		let email = attributes.iter().find(|attribute| attribute.name == "email");
		let delivery = email.filter(|_| state == IdentityState::PendingConfirmation).map(|email| {
			CodeDeliveryDetails {
				destination: Some(mask_email(&email.value)),
				delivery_medium: Some("EMAIL".into()),
				attribute_name: Some("email".into()),
			}
		});

		users.insert(
			username.clone(),
			PoolUser {
				password: password.clone(),
				attributes: attributes.to_vec(),
				state,
				code: format!("{:06}", 100_000 + seq % 900_000),
				sub: sub.clone(),
			},
		);

		Ok(SignUpOutput {
			user_confirmed: state == IdentityState::Confirmed,
			user_sub: Some(sub),
			code_delivery_details: delivery,
		})
	}

	fn confirm_now(
		&self,
		username: &Username,
		code: &str,
		secret_hash: &SecretHash,
	) -> Result<ConfirmSignUpOutput> {
		self.enter(ProviderOperation::Confirm, username, secret_hash)?;

		let mut users = self.users.write();
		let user = users.get_mut(username).ok_or_else(|| {
			Error::rejected(ProviderErrorKind::NotFound, "Username/client id combination not found.")
		})?;

		if user.state == IdentityState::Confirmed {
			return Err(Error::rejected(
				ProviderErrorKind::NotFound,
				"User cannot be confirmed. Current status is CONFIRMED",
			));
		}
		if user.code != code {
			return Err(Error::rejected(
				ProviderErrorKind::InvalidCode,
				"Invalid verification code provided, please try again.",
			));
		}

		user.state = IdentityState::Confirmed;

		Ok(ConfirmSignUpOutput::default())
	}

	fn authenticate_now(
		&self,
		username: &Username,
		password: &Secret,
		secret_hash: &SecretHash,
	) -> Result<InitiateAuthOutput> {
		let seq = self.enter(ProviderOperation::Authenticate, username, secret_hash)?;
		let users = self.users.read();
		let user = users
			.get(username)
			.filter(|user| user.password == *password)
			.ok_or_else(|| {
				Error::rejected(ProviderErrorKind::InvalidCredentials, "Incorrect username or password.")
			})?;

		if user.state != IdentityState::Confirmed {
			return Err(Error::rejected(ProviderErrorKind::NotConfirmed, "User is not confirmed."));
		}

		Ok(InitiateAuthOutput {
			authentication_result: Some(AuthenticationResult {
				access_token: Some(Secret::new(format!("access.{}.{seq}", user.sub))),
				id_token: Some(Secret::new(format!("id.{}.{seq}", user.sub))),
				refresh_token: Some(Secret::new(format!("refresh.{}.{seq}", user.sub))),
				expires_in: Some(3600),
				token_type: Some("Bearer".into()),
			}),
			challenge_parameters: Some(BTreeMap::new()),
			..InitiateAuthOutput::default()
		})
	}
}
impl IdentityProviderClient for MemoryIdentityProvider {
	fn register<'a>(
		&'a self,
		username: &'a Username,
		password: &'a Secret,
		attributes: &'a [UserAttribute],
		secret_hash: &'a SecretHash,
	) -> ProviderFuture<'a, SignUpOutput> {
		Box::pin(async move { self.register_now(username, password, attributes, secret_hash) })
	}

	fn confirm<'a>(
		&'a self,
		username: &'a Username,
		code: &'a str,
		secret_hash: &'a SecretHash,
	) -> ProviderFuture<'a, ConfirmSignUpOutput> {
		Box::pin(async move { self.confirm_now(username, code, secret_hash) })
	}

	fn authenticate<'a>(
		&'a self,
		username: &'a Username,
		password: &'a Secret,
		secret_hash: &'a SecretHash,
	) -> ProviderFuture<'a, InitiateAuthOutput> {
		Box::pin(async move { self.authenticate_now(username, password, secret_hash) })
	}
}

fn mask_email(email: &str) -> String {
	match email.split_once('@') {
		Some((local, domain)) => {
			let head = local.chars().next().map(String::from).unwrap_or_default();
			let tail = domain.chars().next().map(String::from).unwrap_or_default();

			format!("{head}***@{tail}***")
		},
		None => "***".into(),
	}
}

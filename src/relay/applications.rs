//! Application operations.

// crates.io
use reqwest::Method;
// self
use crate::{
	_prelude::*,
	auth::ApplicationId,
	obs::RelayOperation,
	relay::{ApiRequest, FieldMap, Relay},
};

impl Relay {
	/// Applies a partial update to an application (e.g. its status).
	pub async fn update_application(
		&self,
		id: &ApplicationId,
		updates: FieldMap,
	) -> Result<JsonValue> {
		const OPERATION: RelayOperation = RelayOperation::UpdateApplication;

		self.observe(OPERATION, async {
			let url = self.descriptor.api_url(["Applications", id.as_ref()])?;
			let request = ApiRequest::new(OPERATION, Method::PUT, url).json(updates.into_envelope());

			self.authorized_call(&request).await?.json()
		})
		.await
	}
}

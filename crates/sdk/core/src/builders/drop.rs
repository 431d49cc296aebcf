//! `mint_drop` builder.
//!
//! ## Move Contract Reference
//!
//! ```move
//! module drops::collection {
//!     public fun mint(
//!         registry: &mut AddressDropsRegistry,
//!         collection: &mut Collection,
//!         recipient: address,
//!         coords_lat: u32,
//!         coords_lon: u32,
//!         ctx: &mut TxContext,
//!     );
//! }
//! ```
//!
//! Sequence numbers are assigned by the program; the client never chooses one.

use crate::builders::Checks;
use crate::config::DropsConfig;
use crate::error::ValidationError;
use crate::transaction::{MoveTarget, PureArg, TransactionRequest};
use crate::types::{Address, ObjectId};

pub const MINT_FUNCTION: &str = "mint";

/// Input for [`mint_drop`]. Identifiers are taken as text and validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MintDropParams {
    pub collection_id: String,
    pub recipient: String,
    pub coords_lat: Option<u64>,
    pub coords_lon: Option<u64>,
}

impl MintDropParams {
    pub fn new(collection_id: impl Into<String>, recipient: impl Into<String>) -> Self {
        Self {
            collection_id: collection_id.into(),
            recipient: recipient.into(),
            ..Default::default()
        }
    }

    pub fn with_coords(mut self, lat: u64, lon: u64) -> Self {
        self.coords_lat = Some(lat);
        self.coords_lon = Some(lon);
        self
    }
}

/// Build `<package>::<collection module>::mint`.
///
/// The address-drops registry is the first argument, followed by the target
/// collection.
pub fn mint_drop(
    config: &DropsConfig,
    params: &MintDropParams,
) -> Result<TransactionRequest, ValidationError> {
    let mut checks = Checks::new("mint_drop");

    let collection_id = checks.parsed(
        "collection_id",
        ObjectId::parse(params.collection_id.trim()),
        || ObjectId::new(""),
    );
    let recipient = checks.parsed(
        "recipient",
        Address::parse(params.recipient.trim()),
        || Address::new(""),
    );
    let coords_lat = checks.fits::<u32>("coords_lat", params.coords_lat.unwrap_or(0));
    let coords_lon = checks.fits::<u32>("coords_lon", params.coords_lon.unwrap_or(0));

    checks.finish()?;

    let target = MoveTarget::new(
        config.package_id.clone(),
        config.collection_module.clone(),
        MINT_FUNCTION,
    );

    tracing::debug!("Building {} for {} -> {}", target, collection_id, recipient);

    Ok(TransactionRequest::new(target)
        .object(config.address_drops_registry_id.clone())
        .object(collection_id)
        .pure(PureArg::Address(recipient))
        .pure(PureArg::U32(coords_lat))
        .pure(PureArg::U32(coords_lon)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::sample_config;
    use crate::transaction::CallArg;

    const COLLECTION: &str = "0x00c0ffee";
    const RECIPIENT: &str = "0xa11ce";

    #[test]
    fn matches_target_signature() {
        let config = sample_config();
        let request = mint_drop(&config, &MintDropParams::new(COLLECTION, RECIPIENT)).unwrap();

        assert_eq!(
            request.target.to_string(),
            format!("{}::collection::mint", config.package_id)
        );
        assert_eq!(
            request.signature(),
            vec!["object", "object", "address", "u32", "u32"]
        );
        assert_eq!(
            request.arguments[0],
            CallArg::Object(config.address_drops_registry_id.clone())
        );
        assert_eq!(request.arguments[1], CallArg::Object(ObjectId::new(COLLECTION)));
        assert_eq!(
            request.arguments[2],
            CallArg::Pure(PureArg::Address(Address::new(RECIPIENT)))
        );
    }

    #[test]
    fn coordinates_default_to_zero() {
        let config = sample_config();
        let request = mint_drop(&config, &MintDropParams::new(COLLECTION, RECIPIENT)).unwrap();

        assert_eq!(request.arguments[3], CallArg::Pure(PureArg::U32(0)));
        assert_eq!(request.arguments[4], CallArg::Pure(PureArg::U32(0)));

        let placed = mint_drop(
            &config,
            &MintDropParams::new(COLLECTION, RECIPIENT).with_coords(4_512, 1_946),
        )
        .unwrap();
        assert_eq!(placed.arguments[3], CallArg::Pure(PureArg::U32(4_512)));
    }

    #[test]
    fn identifiers_are_normalized() {
        let config = sample_config();
        let request = mint_drop(&config, &MintDropParams::new("0x00C0FFEE", " 0xA11CE ")).unwrap();

        assert_eq!(request.arguments[1], CallArg::Object(ObjectId::new(COLLECTION)));
        assert_eq!(
            request.arguments[2],
            CallArg::Pure(PureArg::Address(Address::new(RECIPIENT)))
        );
    }

    #[test]
    fn malformed_input_is_reported_together() {
        let config = sample_config();
        let params = MintDropParams::new("collection-7", "alice").with_coords(1 << 33, 0);

        let err = mint_drop(&config, &params).unwrap_err();

        assert_eq!(err.call, "mint_drop");
        assert!(err.has_violation_for("collection_id"));
        assert!(err.has_violation_for("recipient"));
        assert!(err.has_violation_for("coords_lat"));
        assert_eq!(err.violations.len(), 3);
    }
}

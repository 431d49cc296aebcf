//! `create_collection` builder.
//!
//! ## Move Contract Reference
//!
//! ```move
//! module drops::collection {
//!     public fun create(
//!         registry: &mut CollectionsRegistry,
//!         name: String,
//!         description: String,
//!         coords_lat: u32,
//!         coords_lon: u32,
//!         flags: u16,
//!         max_supply: u64,
//!         mint_start_time: u64,
//!         mint_stop_time: u64,
//!         ctx: &mut TxContext,
//!     );
//! }
//! ```

use crate::builders::Checks;
use crate::config::DropsConfig;
use crate::error::ValidationError;
use crate::transaction::{MoveTarget, PureArg, TransactionRequest};
use crate::types::{Attributes, Collection, ObjectId};

pub const CREATE_FUNCTION: &str = "create";

/// Input for [`create_collection`].
///
/// Numeric fields are taken wider than their wire types so out-of-range input
/// is reported instead of silently truncated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateCollectionParams {
    pub name: String,
    pub description: String,
    /// Client-side metadata, not sent on-chain.
    pub image: String,
    /// Client-side metadata, not sent on-chain.
    pub attributes: Attributes,
    /// 16-bit on the wire.
    pub flags: u64,
    pub max_supply: u64,
    pub mint_start_time: u64,
    pub mint_stop_time: u64,
    /// 32-bit on the wire; `None` is sent as `0`.
    pub coords_lat: Option<u64>,
    /// 32-bit on the wire; `None` is sent as `0`.
    pub coords_lon: Option<u64>,
}

impl CreateCollectionParams {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn with_flags(mut self, flags: u64) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_max_supply(mut self, max_supply: u64) -> Self {
        self.max_supply = max_supply;
        self
    }

    pub fn with_mint_window(mut self, start: u64, stop: u64) -> Self {
        self.mint_start_time = start;
        self.mint_stop_time = stop;
        self
    }

    pub fn with_coords(mut self, lat: u64, lon: u64) -> Self {
        self.coords_lat = Some(lat);
        self.coords_lon = Some(lon);
        self
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Domain record for the collection once the chain has assigned its ID.
    pub fn into_collection(self, id: ObjectId) -> Result<Collection, ValidationError> {
        let wire = self.validate()?;
        Ok(Collection {
            id: Some(id),
            name: self.name,
            description: self.description,
            image: self.image,
            attributes: self.attributes,
            flags: wire.flags,
            max_supply: self.max_supply,
            mint_start_time: self.mint_start_time,
            mint_stop_time: self.mint_stop_time,
        })
    }

    fn validate(&self) -> Result<WireValues, ValidationError> {
        let mut checks = Checks::new("create_collection");

        checks.require(!self.name.trim().is_empty(), || {
            "name must not be empty".to_string()
        });
        checks.require(self.mint_start_time <= self.mint_stop_time, || {
            format!(
                "mint_start_time ({}) must not be after mint_stop_time ({})",
                self.mint_start_time, self.mint_stop_time
            )
        });

        let flags = checks.fits::<u16>("flags", self.flags);
        let coords_lat = checks.fits::<u32>("coords_lat", self.coords_lat.unwrap_or(0));
        let coords_lon = checks.fits::<u32>("coords_lon", self.coords_lon.unwrap_or(0));

        checks.finish()?;

        Ok(WireValues {
            flags,
            coords_lat,
            coords_lon,
        })
    }
}

struct WireValues {
    flags: u16,
    coords_lat: u32,
    coords_lon: u32,
}

/// Build `<package>::<collection module>::create`.
///
/// The collections registry is always the first argument.
pub fn create_collection(
    config: &DropsConfig,
    params: &CreateCollectionParams,
) -> Result<TransactionRequest, ValidationError> {
    let wire = params.validate()?;

    let target = MoveTarget::new(
        config.package_id.clone(),
        config.collection_module.clone(),
        CREATE_FUNCTION,
    );

    tracing::debug!("Building {} for collection '{}'", target, params.name);

    Ok(TransactionRequest::new(target)
        .object(config.collections_registry_id.clone())
        .pure(PureArg::String(params.name.clone()))
        .pure(PureArg::String(params.description.clone()))
        .pure(PureArg::U32(wire.coords_lat))
        .pure(PureArg::U32(wire.coords_lon))
        .pure(PureArg::U16(wire.flags))
        .pure(PureArg::U64(params.max_supply))
        .pure(PureArg::U64(params.mint_start_time))
        .pure(PureArg::U64(params.mint_stop_time)))
}

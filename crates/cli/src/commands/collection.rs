//! `create-collection`, `collections`, `collection <ID>`.

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, bail};
use clap::Parser;
use drops_sdk_core::{
    Attributes, CreateCollectionParams, ObjectId, SuiNetwork, TypeFilter, create_collection,
    fetch_collection, fetch_collections_registry,
};
use drops_sdk_sui::SuiTransport;

use super::{Session, load_config, parse_attribute, print_json};

/// Largest integer front-ends can represent exactly; an open-ended window.
const OPEN_ENDED_STOP: u64 = 9_007_199_254_740_991;

/// Create a collection
#[derive(Parser)]
pub struct CreateCollection {
    /// Collection name
    #[arg(short, long)]
    name: String,

    #[arg(short, long, default_value = "")]
    description: String,

    /// Image URL (kept client-side)
    #[arg(long, default_value = "")]
    image: String,

    /// Attribute as KEY=v1,v2 (repeatable, kept client-side)
    #[arg(short, long = "attribute", value_parser = parse_attribute)]
    attributes: Vec<(String, Vec<String>)>,

    /// Flag bitmask (16-bit)
    #[arg(long, default_value_t = 0)]
    flags: u64,

    #[arg(long)]
    max_supply: u64,

    /// Mint window start, ms since epoch (default: now)
    #[arg(long)]
    start: Option<u64>,

    /// Mint window end, ms since epoch (default: open-ended)
    #[arg(long, default_value_t = OPEN_ENDED_STOP)]
    stop: u64,

    /// Latitude (32-bit, default 0)
    #[arg(long)]
    lat: Option<u64>,

    /// Longitude (32-bit, default 0)
    #[arg(long)]
    lon: Option<u64>,
}

impl CreateCollection {
    pub async fn execute(self) -> Result<()> {
        let session = Session::open().await?;
        let config = session.config;

        let params = CreateCollectionParams {
            name: self.name,
            description: self.description,
            image: self.image,
            attributes: self.attributes.into_iter().collect::<Attributes>(),
            flags: self.flags,
            max_supply: self.max_supply,
            mint_start_time: self.start.unwrap_or_else(now_ms),
            mint_stop_time: self.stop,
            coords_lat: self.lat,
            coords_lon: self.lon,
        };

        let request = create_collection(config, &params)?;
        let ids = session
            .run(&request, &TypeFilter::new(config.collection_type()))
            .await?;

        let [id] = ids.as_slice() else {
            bail!(
                "expected one created collection, the chain reported {}",
                ids.len()
            );
        };

        println!("Collection:  {}", id);
        if config.network != SuiNetwork::Localnet {
            println!(
                "Explorer:    https://suiscan.xyz/{}/object/{}",
                config.network, id
            );
        }

        let collection = params.into_collection(id.clone())?;
        print_json(&collection)
    }
}

/// List collections in the collections registry
#[derive(Parser)]
pub struct ShowCollections {
    /// Also fetch and print each collection
    #[arg(long)]
    full: bool,
}

impl ShowCollections {
    pub async fn execute(self) -> Result<()> {
        let config = load_config()?;
        let transport = SuiTransport::connect(config).await?;

        let registry = fetch_collections_registry(&transport, config)
            .await
            .context("Failed to read collections registry")?;

        println!("Registry: {} (counter {})", registry.id, registry.counter);
        for id in &registry.ids {
            if self.full {
                let collection = fetch_collection(&transport, id).await?;
                print_json(&collection)?;
            } else {
                println!("  {}", id);
            }
        }

        Ok(())
    }
}

/// Show one collection
#[derive(Parser)]
pub struct ShowCollection {
    #[arg(value_name = "ID")]
    id: String,
}

impl ShowCollection {
    pub async fn execute(self) -> Result<()> {
        let id = ObjectId::parse(&self.id).map_err(anyhow::Error::msg)?;
        let config = load_config()?;
        let transport = SuiTransport::connect(config).await?;

        let collection = fetch_collection(&transport, &id)
            .await
            .with_context(|| format!("Failed to read collection {}", id))?;

        print_json(&collection)?;
        println!("Minting open: {}", collection.is_minting_open(now_ms()));
        Ok(())
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

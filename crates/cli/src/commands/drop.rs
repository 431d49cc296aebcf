//! `mint-drop` and `drop <ID>`.

use anyhow::{Context, Result};
use clap::Parser;
use drops_sdk_core::{
    MintDropParams, ObjectId, SigningIdentity, TypeFilter, fetch_drop, mint_drop,
};
use drops_sdk_sui::SuiTransport;

use super::{Session, load_config, print_json};

/// Mint a drop from a collection
#[derive(Parser)]
pub struct MintDrop {
    /// Collection object ID
    #[arg(value_name = "COLLECTION_ID")]
    collection_id: String,

    /// Receiving address (default: the signer)
    #[arg(short, long)]
    recipient: Option<String>,

    #[arg(long)]
    lat: Option<u64>,

    #[arg(long)]
    lon: Option<u64>,
}

impl MintDrop {
    pub async fn execute(self) -> Result<()> {
        let session = Session::open().await?;
        let config = session.config;

        let params = MintDropParams {
            collection_id: self.collection_id,
            recipient: self
                .recipient
                .unwrap_or_else(|| session.signer.address()),
            coords_lat: self.lat,
            coords_lon: self.lon,
        };

        let request = mint_drop(config, &params)?;
        let ids = session
            .run(&request, &TypeFilter::new(config.drop_type()))
            .await?;

        for id in &ids {
            println!("Drop:        {}", id);
        }
        if ids.is_empty() {
            println!("No drop object reported; check the transaction in an explorer");
        }

        Ok(())
    }
}

/// Show one drop
#[derive(Parser)]
pub struct ShowDrop {
    #[arg(value_name = "ID")]
    id: String,
}

impl ShowDrop {
    pub async fn execute(self) -> Result<()> {
        let id = ObjectId::parse(&self.id).map_err(anyhow::Error::msg)?;
        let config = load_config()?;
        let transport = SuiTransport::connect(config).await?;

        let drop = fetch_drop(&transport, &id)
            .await
            .with_context(|| format!("Failed to read drop {}", id))?;

        print_json(&drop)
    }
}

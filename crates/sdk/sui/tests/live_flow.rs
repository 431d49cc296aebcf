//! Live network flow against a deployed drops package.
//!
//! Needs a funded `USER_PRIVATE_KEY` and the usual configuration in the
//! environment or a `.env` file:
//!
//! ```bash
//! cargo test -p drops-sdk-sui --test live_flow -- --ignored --nocapture
//! ```

use drops_sdk_core::{
    CreateCollectionParams, DropsConfig, ExecutionGateway, MintDropParams, SigningIdentity,
    TypeFilter, create_collection, fetch_collection, fetch_collections_registry, mint_drop,
};
use drops_sdk_sui::{SuiTransport, get_signer};

// 2^53 - 1, the largest stop time front-ends can represent exactly
const OPEN_ENDED: u64 = 9_007_199_254_740_991;

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64
}

#[tokio::test]
#[ignore = "requires a configured Sui network and a funded key"]
async fn create_collection_then_mint() {
    let _ = dotenvy::dotenv();

    let config = DropsConfig::init_from_env().unwrap();
    let signer = get_signer(config.user_private_key()).unwrap();
    let transport = SuiTransport::connect(config).await.unwrap();
    let gateway = ExecutionGateway::from_config(transport, config);

    let params = CreateCollectionParams::new("Test Collection", "Test Collection Description")
        .with_max_supply(100)
        .with_mint_window(now_ms(), OPEN_ENDED);
    let request = create_collection(config, &params).unwrap();

    let response = gateway.execute(&request, &signer).await.unwrap();
    assert!(response.is_success(), "{:?}", response.rejection());

    let ids = response.created_ids(Some(&TypeFilter::new(config.collection_type())));
    assert_eq!(ids.len(), 1);
    let collection_id = ids[0].clone();

    let registry = fetch_collections_registry(gateway.transport(), config)
        .await
        .unwrap();
    assert!(registry.ids.contains(&collection_id));

    let collection = fetch_collection(gateway.transport(), &collection_id)
        .await
        .unwrap();
    assert_eq!(collection.name, "Test Collection");
    assert_eq!(collection.max_supply, 100);

    let request = mint_drop(
        config,
        &MintDropParams::new(collection_id.as_str(), signer.address()),
    )
    .unwrap();
    let response = gateway.execute(&request, &signer).await.unwrap();
    assert!(response.is_success(), "{:?}", response.rejection());
    assert_eq!(
        response
            .created_ids(Some(&TypeFilter::new(config.drop_type())))
            .len(),
        1
    );
}

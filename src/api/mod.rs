/*
 * REST API module exposing the read pipelines
 */

use crate::config::{ChainLabel, Config};
use crate::models::{Listing, NftMetadata, PairInventory, PoolResolution};
use crate::service::MarketplaceService;
use crate::utils::parse_address;
use ethers::types::{Address, U256};
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::{get, routes, State};
use std::str::FromStr;
use std::sync::Arc;

pub struct ApiState {
    pub config: Config,
    pub service: Arc<MarketplaceService>,
}

type ApiResult<T> = std::result::Result<Json<T>, Custom<String>>;

fn bad_request(message: String) -> Custom<String> {
    Custom(rocket::http::Status::BadRequest, message)
}

fn upstream_error(message: String) -> Custom<String> {
    Custom(rocket::http::Status::InternalServerError, message)
}

fn parse_chain(chain: &str) -> std::result::Result<ChainLabel, Custom<String>> {
    ChainLabel::from_str(chain).map_err(|e| bad_request(format!("Invalid chain: {e}")))
}

fn parse_addr(value: &str) -> std::result::Result<Address, Custom<String>> {
    parse_address(value).map_err(|e| bad_request(format!("Invalid address: {e}")))
}

#[get("/api/v1/listings/<chain>/<collection>")]
pub async fn get_listings(
    chain: &str,
    collection: &str,
    state: &State<ApiState>,
) -> ApiResult<Vec<Listing>> {
    let label = parse_chain(chain)?;
    let collection = parse_addr(collection)?;

    let listings = state
        .service
        .fetch_listings(label, collection)
        .await
        .map_err(|e| upstream_error(format!("Error fetching listings: {e}")))?;

    Ok(Json(listings))
}

#[get("/api/v1/pairs/<chain>/<pair>")]
pub async fn get_pair_inventory(
    chain: &str,
    pair: &str,
    state: &State<ApiState>,
) -> ApiResult<PairInventory> {
    let label = parse_chain(chain)?;
    let pair = parse_addr(pair)?;

    let inventory = state
        .service
        .pair_inventory(label, pair)
        .await
        .map_err(|e| upstream_error(format!("Error fetching pair inventory: {e}")))?;

    Ok(Json(inventory))
}

#[get("/api/v1/pools/<chain>/<collection>/<token_id>")]
pub async fn get_pool(
    chain: &str,
    collection: &str,
    token_id: &str,
    state: &State<ApiState>,
) -> ApiResult<PoolResolution> {
    let label = parse_chain(chain)?;
    let collection = parse_addr(collection)?;
    let token_id = U256::from_dec_str(token_id)
        .map_err(|e| bad_request(format!("Invalid token id: {e}")))?;

    let resolution = state
        .service
        .resolve_pool(label, collection, token_id)
        .await
        .map_err(|e| upstream_error(format!("Error resolving pool: {e}")))?;

    Ok(Json(resolution))
}

#[get("/api/v1/metadata/<chain>/<collection>/<token_id>")]
pub async fn get_metadata(
    chain: &str,
    collection: &str,
    token_id: &str,
    state: &State<ApiState>,
) -> ApiResult<NftMetadata> {
    let label = parse_chain(chain)?;
    let collection = parse_addr(collection)?;
    let token_id = U256::from_dec_str(token_id)
        .map_err(|e| bad_request(format!("Invalid token id: {e}")))?;

    let mut items = state
        .service
        .fetch_metadata(label, collection, &[token_id])
        .await
        .map_err(|e| upstream_error(format!("Error fetching metadata: {e}")))?;

    items
        .pop()
        .map(Json)
        .ok_or_else(|| upstream_error("Empty metadata response".to_string()))
}

#[get("/health")]
pub async fn health_check() -> &'static str {
    "OK"
}

#[must_use]
pub fn create_rocket(state: ApiState) -> rocket::Rocket<rocket::Build> {
    let figment = rocket::Config::figment()
        .merge(("address", state.config.server.host.clone()))
        .merge(("port", state.config.server.port));

    rocket::custom(figment).manage(state).mount(
        "/",
        routes![
            get_listings,
            get_pair_inventory,
            get_pool,
            get_metadata,
            health_check
        ],
    )
}

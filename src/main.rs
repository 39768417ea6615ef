#![forbid(unsafe_code)]

use lazy_static::lazy_static;
use log::info;
use poem::endpoint::StaticFilesEndpoint;
use poem::error::{MethodNotAllowedError, NotFoundError};
use poem::http::StatusCode;
use poem::listener::TcpListener;
use poem::{Endpoint, EndpointExt, Response, Route};
use poem_openapi::OpenApiService;
use std::time::Instant;

// Friends Server Utilities
use crate::api::friends_create::CreateFriendApi;
use crate::api::friends_delete::DeleteFriendApi;
use crate::api::friends_get::GetFriendApi;
use crate::api::friends_list::ListFriendsApi;
use crate::api::friends_patch::PatchFriendApi;
use crate::api::friends_update::UpdateFriendApi;
use crate::web::about::AboutApi;
use crate::web::friend_detail::FriendDetailApi;
use crate::web::friends_page::FriendsPageApi;
use crate::web::home::HomeApi;
use crate::web::year::YearApi;
use crate::utils::config::{init_log, init_runtime_context, RuntimeCtx};
use crate::utils::errors::Errors;
use crate::utils::roster::RosterStore;
use crate::utils::srv_utils::{get_absolute_path, normalize_form_body};
use crate::utils::templates::TEMPLATES;

// Modules
mod api;
mod utils;
mod web;

// ***************************************************************************
//                                Constants
// ***************************************************************************
const SERVER_NAME : &str = "FriendsServer"; // for poem logging

// Body served for every request no route claims.
const FALLBACK_404_BODY : &str = "404 - page not found";

// ***************************************************************************
//                             Static Variables
// ***************************************************************************
// Lazily initialize the parameters variable so that is has a 'static lifetime.
// We exit if we can't read our parameters.
lazy_static! {
    static ref RUNTIME_CTX: RuntimeCtx = init_runtime_context();
}

// ---------------------------------------------------------------------------
// main:
// ---------------------------------------------------------------------------
#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    // --------------- Initialize Friends Server ------
    // Announce ourselves.
    println!("Starting friends_server!");

    // Initialize the server.
    friends_init();

    // --------------- Main Loop Set Up ---------------
    // Create the roster that every request handler shares, prepopulated
    // with the records each server process starts with.
    let store = RosterStore::seeded();
    info!("Seeded roster with {} friends.", store.len());
    let app = build_app(store);

    // Assign the server address.
    let addr = format!("{}:{}",
        RUNTIME_CTX.parms.config.http_addr,
        RUNTIME_CTX.parms.config.http_port);
    println!("Server running at http://{}/", addr);

    // ------------------ Main Loop -------------------
    poem::Server::new(TcpListener::bind(addr))
        .name(SERVER_NAME)
        .run(app)
        .await
}

// ***************************************************************************
//                             Private Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// friends_init:
// ---------------------------------------------------------------------------
/** Initialing all subsystems and data structures other than those needed
 * to configure the main loop processor.
 */
fn friends_init() {
    // Configure out log.
    init_log();

    // Force the reading of input parameters and initialization of runtime context.
    info!("{}", Errors::InputParms(format!("{:#?}", *RUNTIME_CTX)));

    // Log build info.
    print_version_info();

    // Force template compilation so a bad template aborts startup rather
    // than the first page request.
    info!("Compiled {} page templates.", TEMPLATES.get_template_names().count());
}

// ---------------------------------------------------------------------------
// print_version_info:
// ---------------------------------------------------------------------------
fn print_version_info() {
    // Log build info.
    info!("{}.", format!("\n*** Running FriendsServer={}",
                        option_env!("CARGO_PKG_VERSION").unwrap_or("unknown")),
    );
}

// ---------------------------------------------------------------------------
// build_app:
// ---------------------------------------------------------------------------
/** Assemble the complete endpoint tree around one roster store.  The server
 * and the tests build the identical tree; only the store differs.
 *
 * Requests pass through three layers on the way in: the request logger,
 * the body normalizer that turns url-encoded submissions into JSON, and
 * the router.  Router misses surface as the plain-text fallback page.
 */
pub(crate) fn build_app(store: RosterStore) -> impl Endpoint {
    // Every handler holds its own handle on the shared roster.
    let endpoints = (
        HomeApi,
        AboutApi,
        YearApi,
        FriendsPageApi::new(store.clone()),
        FriendDetailApi::new(store.clone()),
        ListFriendsApi::new(store.clone()),
        GetFriendApi::new(store.clone()),
        CreateFriendApi::new(store.clone()),
        UpdateFriendApi::new(store.clone()),
        PatchFriendApi::new(store.clone()),
        DeleteFriendApi::new(store),
    );
    let api_service =
        OpenApiService::new(endpoints, RUNTIME_CTX.parms.config.title.clone(), "0.1.0")
            .server(format!("http://{}:{}",
                RUNTIME_CTX.parms.config.http_addr,
                RUNTIME_CTX.parms.config.http_port));

    // Allow the generated openapi specs to be retrieved from the server.
    let spec = api_service.spec_endpoint();
    let spec_yaml = api_service.spec_endpoint_yaml();
    let ui = api_service.swagger_ui();

    // Static assets live under their own prefix so they cannot shadow the
    // page and api routes.
    let public_dir = get_absolute_path(&RUNTIME_CTX.parms.config.public_dir);

    // Create the routes.
    Route::new()
        .nest("/", api_service)
        .nest("/public", StaticFilesEndpoint::new(public_dir))
        .nest("/docs", ui)
        .at("/spec", spec)
        .at("/spec_yaml", spec_yaml)
        .catch_error(|_: NotFoundError| async move { fallback_404() })
        .catch_error(|_: MethodNotAllowedError| async move { fallback_404() })
        .before(normalize_form_body)
        .around(|ep, req| async move {
            let method = req.method().clone();
            let path = req.uri().path().to_string();
            let start = Instant::now();
            let resp = ep.get_response(req).await;
            info!("{} {} -> {} in {} ms", method, path, resp.status(),
                  start.elapsed().as_millis());
            Ok(resp)
        })
}

// ---------------------------------------------------------------------------
// fallback_404:
// ---------------------------------------------------------------------------
// The catch-all page, served with the same body for every unclaimed path
// and method.
fn fallback_404() -> Response {
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .content_type("text/html; charset=utf-8")
        .body(FALLBACK_404_BODY)
}

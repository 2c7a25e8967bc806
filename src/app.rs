use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post, MethodRouter},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::{Authenticator, PasswordHasher, TokenIssuer, TokenValidator};
use crate::config::{AppConfig, SecurityConfig};
use crate::database::{DatabaseError, Stores};
use crate::handlers::{protected, public, system};
use crate::middleware::{authorize_call, CallAuthorizer};
use crate::sections::{Contact, Detail, Footer, Hero, Nav, Section, Slider};

/// Shared handler state. Everything is built once at startup from config.
#[derive(Clone)]
pub struct AppState {
    pub stores: Stores,
    pub hasher: Arc<PasswordHasher>,
    pub authenticator: Arc<Authenticator>,
    pub issuer: Arc<TokenIssuer>,
    pub authorizer: CallAuthorizer,
}

impl AppState {
    pub fn new(security: &SecurityConfig, stores: Stores) -> Self {
        let hasher = Arc::new(PasswordHasher::new());
        let authenticator = Arc::new(Authenticator::new(stores.credentials.clone(), hasher.clone()));
        let validator = Arc::new(TokenValidator::new(security));

        Self {
            stores,
            hasher,
            authenticator,
            issuer: Arc::new(TokenIssuer::new(security)),
            authorizer: CallAuthorizer::new(validator),
        }
    }

    pub async fn from_config(config: &AppConfig) -> Result<Self, DatabaseError> {
        let stores = Stores::from_config(&config.database).await?;
        Ok(Self::new(&config.security, stores))
    }
}

/// One remotely callable operation and whether it sits behind the CallAuthorizer.
#[derive(Debug, Clone, Copy)]
pub struct Operation {
    pub name: &'static str,
    pub path: &'static str,
    pub requires_auth: bool,
    route: fn() -> MethodRouter<AppState>,
}

impl Operation {
    pub fn method_router(&self) -> MethodRouter<AppState> {
        (self.route)()
    }
}

fn login_route() -> MethodRouter<AppState> {
    post(public::auth::login_post)
}

fn register_route() -> MethodRouter<AppState> {
    post(public::auth::register_post)
}

fn section_route<S: Section>() -> MethodRouter<AppState> {
    post(protected::update_section::<S>)
}

static OPERATIONS: [Operation; 8] = [
    Operation { name: "login", path: "/auth/login", requires_auth: false, route: login_route },
    Operation { name: "register", path: "/auth/register", requires_auth: false, route: register_route },
    Operation { name: "updateHeroSection", path: "/api/sections/hero", requires_auth: true, route: section_route::<Hero> },
    Operation { name: "updateNavSection", path: "/api/sections/nav", requires_auth: true, route: section_route::<Nav> },
    Operation { name: "updateFooterSection", path: "/api/sections/footer", requires_auth: true, route: section_route::<Footer> },
    Operation { name: "updateContactSection", path: "/api/sections/contact", requires_auth: true, route: section_route::<Contact> },
    Operation { name: "updateDetailSection", path: "/api/sections/detail", requires_auth: true, route: section_route::<Detail> },
    Operation { name: "updateSliderSection", path: "/api/sections/slider", requires_auth: true, route: section_route::<Slider> },
];

pub fn operations() -> &'static [Operation] {
    &OPERATIONS
}

/// Put `route` behind the CallAuthorizer. Rejected calls never reach the handler.
pub fn require_auth<S>(route: MethodRouter<S>, authorizer: CallAuthorizer) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    route.route_layer(from_fn_with_state(authorizer, authorize_call))
}

pub fn router(state: AppState, security: &SecurityConfig) -> Router {
    let mut router = Router::new()
        .route("/", get(system::root))
        .route("/health", get(system::health));

    for op in operations() {
        let route = if op.requires_auth {
            require_auth(op.method_router(), state.authorizer.clone())
        } else {
            op.method_router()
        };
        tracing::debug!("Registered {} at {} (auth: {})", op.name, op.path, op.requires_auth);
        router = router.route(op.path, route);
    }

    router
        .layer(cors_layer(&security.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

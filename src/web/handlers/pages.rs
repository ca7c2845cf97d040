// Page handlers for HTML rendering with Askama

use askama::Template;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::config::SUPPORT_EMAIL;
use crate::resolver::ListOptions;
use crate::server::{with_resolver, AppState};
use crate::web::view_models::{Layout, PlaqueCard, PlaqueDetail};

const SITE_TITLE: &str = "Legacy - Discover London's Blue Plaques";
const SITE_DESCRIPTION: &str = "Explore and collect 2000+ Blue Plaques across London. \
    Turn your walks and runs into historical adventures with interactive maps and route generation.";

fn render<T: Template>(template: T) -> Html<String> {
    Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Template error: {}", e);
        format!("Template error: {}", e)
    }))
}

// ============================================================================
// Home Page
// ============================================================================

#[derive(Template)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
}

pub async fn home_page() -> impl IntoResponse {
    render(HomeTemplate {
        layout: Layout::new(SITE_TITLE, SITE_DESCRIPTION),
    })
}

// ============================================================================
// Plaque Listing
// ============================================================================

#[derive(Template)]
#[template(path = "pages/plaques.html")]
pub struct PlaquesTemplate {
    pub layout: Layout,
    pub cards: Vec<PlaqueCard>,
}

pub async fn plaques_page(State(state): State<AppState>) -> impl IntoResponse {
    let plaques = with_resolver(&state, |resolver| resolver.list_all(ListOptions::default()))
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Listing page failed: {:?}", e);
            Vec::new()
        });

    render(PlaquesTemplate {
        layout: Layout::new(
            "London Blue Plaques - Legacy",
            "Explore blue plaques across London with the Legacy app",
        ),
        cards: plaques.iter().map(PlaqueCard::from).collect(),
    })
}

// ============================================================================
// Plaque Detail
// ============================================================================

#[derive(Template)]
#[template(path = "pages/plaque.html")]
pub struct PlaqueTemplate {
    pub layout: Layout,
    pub plaque: PlaqueDetail,
}

pub async fn plaque_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let lookup_id = id.clone();
    let plaque = with_resolver(&state, move |resolver| resolver.find_by_id(&lookup_id))
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Detail page for {} failed: {:?}", id, e);
            None
        });

    match plaque {
        Some(plaque) => {
            let detail = PlaqueDetail::from(&plaque);
            let og = detail.open_graph(&state.config.site_url);
            let layout = Layout::new(og.title.clone(), og.description.clone()).with_open_graph(og);
            render(PlaqueTemplate {
                layout,
                plaque: detail,
            })
            .into_response()
        }
        None => not_found(
            "Plaque not found",
            "We couldn't find that Blue Plaque. It may have moved, or the link may be incomplete.",
        ),
    }
}

// ============================================================================
// Static Pages
// ============================================================================

#[derive(Template)]
#[template(path = "pages/privacy.html")]
pub struct PrivacyTemplate {
    pub layout: Layout,
}

pub async fn privacy_page() -> impl IntoResponse {
    render(PrivacyTemplate {
        layout: Layout::new("Privacy Policy - Legacy", "Privacy policy for Legacy iOS app"),
    })
}

#[derive(Template)]
#[template(path = "pages/support.html")]
pub struct SupportTemplate {
    pub layout: Layout,
    pub support_email: &'static str,
}

pub async fn support_page() -> impl IntoResponse {
    render(SupportTemplate {
        layout: Layout::new("Support - Legacy", "Get support for Legacy iOS app"),
        support_email: SUPPORT_EMAIL,
    })
}

// ============================================================================
// Not Found
// ============================================================================

#[derive(Template)]
#[template(path = "pages/not_found.html")]
pub struct NotFoundTemplate {
    pub layout: Layout,
    pub heading: &'static str,
    pub message: &'static str,
}

fn not_found(heading: &'static str, message: &'static str) -> Response {
    let page = render(NotFoundTemplate {
        layout: Layout::new(format!("{} - Legacy", heading), message),
        heading,
        message,
    });
    (StatusCode::NOT_FOUND, page).into_response()
}

pub async fn not_found_page() -> Response {
    not_found("Page not found", "There is nothing at this address.")
}

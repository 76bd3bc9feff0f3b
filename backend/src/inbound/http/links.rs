//! Link collection endpoints.
//!
//! ```text
//! GET /api/v1/users/me/links
//! PUT /api/v1/users/me/links {"expectedRevision":1,"links":[{"id":-1,"website":"GitHub","username":"ada","position":1}]}
//! GET /api/v1/users/{userId}/links
//! ```
//!
//! A save always carries the full list. The owner comes from the session
//! cookie and list order decides positions; any `position` sent by the
//! client is accepted for compatibility and ignored.

use std::str::FromStr;

use actix_web::{HttpResponse, get, http::header, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::{
    ApiResult, Error, LinkCollection, LinkHandle, LinkId, LinkSubmission, Platform, StoredLink,
    SubmittedLink,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    USER_ID, invalid_handle_error, invalid_link_id_error, parse_user_id, unknown_platform_error,
};

/// One entry of a save request.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct LinkPayload {
    /// Stored id, or a negative pending token for entries added since the
    /// last fetch.
    pub id: i64,
    /// Platform display name.
    #[schema(example = "GitHub")]
    pub website: String,
    /// Handle on that platform.
    #[schema(example = "octocat")]
    pub username: String,
    /// Ignored; positions follow list order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
}

/// Request body for `PUT /api/v1/users/me/links`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveLinksRequest {
    /// Revision the client last fetched; `0` before the first save.
    pub expected_revision: u32,
    /// The complete desired list in display order.
    pub links: Vec<LinkPayload>,
}

impl TryFrom<SaveLinksRequest> for LinkSubmission {
    type Error = Error;

    fn try_from(value: SaveLinksRequest) -> Result<Self, Self::Error> {
        let links = value
            .links
            .into_iter()
            .enumerate()
            .map(|(index, link)| parse_link(index, link))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            expected_revision: value.expected_revision,
            links,
        })
    }
}

fn parse_link(index: usize, link: LinkPayload) -> Result<SubmittedLink, Error> {
    let id = LinkId::from_wire(link.id).map_err(|_| invalid_link_id_error(index, link.id))?;
    let platform = Platform::from_str(&link.website)
        .map_err(|_| unknown_platform_error(index, &link.website))?;
    let handle = LinkHandle::new(&link.username)
        .map_err(|err| invalid_handle_error(index, &link.username, &err))?;
    Ok(SubmittedLink {
        id,
        platform,
        handle,
    })
}

/// A stored link as returned to clients.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct LinkResponse {
    #[schema(example = 42)]
    pub id: i64,
    #[schema(example = "GitHub")]
    pub website: String,
    #[schema(example = "octocat")]
    pub username: String,
    /// 1-based position within the owner's list.
    #[schema(example = 1)]
    pub position: u32,
    /// Public profile URL derived from platform and handle.
    #[schema(example = "https://github.com/octocat")]
    pub url: String,
}

impl From<&StoredLink> for LinkResponse {
    fn from(link: &StoredLink) -> Self {
        Self {
            id: link.id.get(),
            website: link.platform.as_str().to_owned(),
            username: link.handle.to_string(),
            position: link.position,
            url: link.profile_url(),
        }
    }
}

/// Authoritative link collection.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinkCollectionResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub owner_id: String,
    /// Revision to send as `expectedRevision` on the next save.
    pub revision: u32,
    pub links: Vec<LinkResponse>,
}

impl From<&LinkCollection> for LinkCollectionResponse {
    fn from(collection: &LinkCollection) -> Self {
        Self {
            owner_id: collection.owner_id.to_string(),
            revision: collection.revision,
            links: collection.links.iter().map(LinkResponse::from).collect(),
        }
    }
}

fn private_json(collection: &LinkCollection) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(LinkCollectionResponse::from(collection))
}

/// Fetch the caller's own links.
#[utoipa::path(
    get,
    path = "/api/v1/users/me/links",
    responses(
        (status = 200, description = "Caller's links sorted by position", body = LinkCollectionResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Link store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["links"],
    operation_id = "getMyLinks"
)]
#[get("/users/me/links")]
pub async fn get_my_links(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let owner_id = session.require_user_id()?;
    let collection = state.links_query.fetch(&owner_id).await?;
    Ok(private_json(&collection))
}

/// Replace the caller's link list with the submitted one.
///
/// Entries with stored ids are updated in place, pending ids become new
/// rows, and stored links missing from the list are deleted. The whole save
/// commits or nothing does.
#[utoipa::path(
    put,
    path = "/api/v1/users/me/links",
    request_body = SaveLinksRequest,
    responses(
        (status = 200, description = "Links saved; body is the committed collection", body = LinkCollectionResponse),
        (status = 400, description = "Invalid entry, duplicate id or too many links", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "A claimed id is not owned by the caller", body = ErrorSchema),
        (status = 409, description = "expectedRevision is stale", body = ErrorSchema),
        (status = 503, description = "Link store unavailable; retry", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["links"],
    operation_id = "saveMyLinks"
)]
#[put("/users/me/links")]
pub async fn save_my_links(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SaveLinksRequest>,
) -> ApiResult<HttpResponse> {
    let owner_id = session.require_user_id()?;
    let submission = LinkSubmission::try_from(payload.into_inner())?;
    debug!(
        owner_id = %owner_id,
        submitted = submission.links.len(),
        expected_revision = submission.expected_revision,
        "save requested"
    );
    let collection = state.links.save(&owner_id, submission).await?;
    Ok(private_json(&collection))
}

/// Fetch another owner's links for public profile rendering.
///
/// An owner who has never saved has no public profile and reads as not found.
/// An owner who saved an empty list reads as an empty collection.
#[utoipa::path(
    get,
    path = "/api/v1/users/{userId}/links",
    params(("userId" = String, Path, description = "Owner id (UUID)")),
    responses(
        (status = 200, description = "Owner's links sorted by position", body = LinkCollectionResponse),
        (status = 400, description = "Malformed owner id", body = ErrorSchema),
        (status = 404, description = "Owner has no public profile", body = ErrorSchema),
        (status = 503, description = "Link store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["links"],
    operation_id = "getPublicLinks",
    security([])
)]
#[get("/users/{user_id}/links")]
pub async fn get_public_links(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<LinkCollectionResponse>> {
    let owner_id = parse_user_id(&path.into_inner(), USER_ID)?;
    let collection = state.links_query.fetch(&owner_id).await?;
    if collection.revision == 0 {
        return Err(Error::not_found("no public profile for this user")
            .with_details(json!({ "userId": owner_id.to_string(), "code": "unknown_owner" })));
    }
    Ok(web::Json(LinkCollectionResponse::from(&collection)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::ports::{
        FixtureLoginService, MockLinksCommand, MockLinksQuery,
    };
    use crate::domain::{StoredLinkId, UserId};
    use crate::inbound::http::test_utils::{logged_in_cookie, test_session_middleware};
    use actix_web::{App, http::StatusCode, test as actix_test};
    use rstest::rstest;
    use serde_json::{Value, json};

    const OWNER: &str = "11111111-1111-1111-1111-111111111111";

    fn owner() -> UserId {
        UserId::new(OWNER).expect("fixture owner")
    }

    fn stored(id: i64, platform: Platform, handle: &str, position: u32) -> StoredLink {
        StoredLink {
            id: StoredLinkId::new(id).expect("stored id"),
            owner_id: owner(),
            platform,
            handle: LinkHandle::new(handle).expect("handle"),
            position,
        }
    }

    fn collection(revision: u32, links: Vec<StoredLink>) -> LinkCollection {
        LinkCollection {
            owner_id: owner(),
            revision,
            links,
        }
    }

    fn state(command: MockLinksCommand, query: MockLinksQuery) -> HttpState {
        HttpState::new(
            Arc::new(FixtureLoginService),
            Arc::new(command),
            Arc::new(query),
        )
    }

    macro_rules! links_app {
        ($state:expr) => {
            actix_test::init_service(
                App::new()
                    .app_data(web::Data::new($state))
                    .wrap(test_session_middleware())
                    .service(
                        web::scope("/api/v1")
                            .service(crate::inbound::http::test_utils::login_as)
                            .service(get_my_links)
                            .service(save_my_links)
                            .service(get_public_links),
                    ),
            )
            .await
        };
    }

    #[rstest]
    fn request_conversion_keeps_order_and_ignores_positions() {
        let request: SaveLinksRequest = serde_json::from_value(json!({
            "expectedRevision": 3,
            "links": [
                { "id": 2, "website": "GitLab", "username": "ada", "position": 9 },
                { "id": -17, "website": "Dev.to", "username": " ada " },
            ],
        }))
        .expect("request shape");

        let submission = LinkSubmission::try_from(request).expect("valid request");

        assert_eq!(submission.expected_revision, 3);
        let wire: Vec<i64> = submission.links.iter().map(|l| l.id.to_wire()).collect();
        assert_eq!(wire, vec![2, -17]);
        assert_eq!(submission.links[1].platform, Platform::DevTo);
        assert_eq!(submission.links[1].handle.as_ref(), "ada");
    }

    #[rstest]
    #[case::zero_id(json!({ "id": 0, "website": "GitHub", "username": "ada" }), "links[1].id")]
    #[case::platform(json!({ "id": 5, "website": "MySpace", "username": "ada" }), "links[1].website")]
    #[case::handle(json!({ "id": 5, "website": "GitHub", "username": "  " }), "links[1].username")]
    fn request_conversion_reports_the_bad_row(#[case] bad: Value, #[case] field: &str) {
        let request: SaveLinksRequest = serde_json::from_value(json!({
            "expectedRevision": 0,
            "links": [{ "id": 1, "website": "GitHub", "username": "ok" }, bad],
        }))
        .expect("request shape");

        let err = LinkSubmission::try_from(request).expect_err("invalid row");

        let details = err.details().expect("details");
        assert_eq!(details["field"], field);
        assert_eq!(details["index"], 1);
    }

    #[rstest]
    fn response_includes_profile_urls() {
        let body = LinkCollectionResponse::from(&collection(
            2,
            vec![stored(7, Platform::StackOverflow, "users/1/ada", 1)],
        ));
        let value = serde_json::to_value(body).expect("serialise");
        assert_eq!(
            value,
            json!({
                "ownerId": OWNER,
                "revision": 2,
                "links": [{
                    "id": 7,
                    "website": "Stack Overflow",
                    "username": "users/1/ada",
                    "position": 1,
                    "url": "https://stackoverflow.com/users/1/ada",
                }],
            })
        );
    }

    #[actix_web::test]
    async fn reading_own_links_requires_a_session() {
        let app = links_app!(state(MockLinksCommand::new(), MockLinksQuery::new()));
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/users/me/links")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn save_passes_session_owner_and_returns_committed_state() {
        let mut command = MockLinksCommand::new();
        command
            .expect_save()
            .withf(|owner_id, submission| {
                owner_id.to_string() == OWNER
                    && submission.expected_revision == 1
                    && submission.links.len() == 2
            })
            .times(1)
            .returning(|_, _| {
                Ok(collection(
                    2,
                    vec![
                        stored(5, Platform::GitHub, "ada", 1),
                        stored(9, Platform::YouTube, "adatube", 2),
                    ],
                ))
            });
        let app = links_app!(state(command, MockLinksQuery::new()));
        let cookie = logged_in_cookie(&app, OWNER).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri("/api/v1/users/me/links")
                .cookie(cookie)
                .set_json(json!({
                    "expectedRevision": 1,
                    "links": [
                        { "id": 5, "website": "GitHub", "username": "ada", "position": 1 },
                        { "id": -1, "website": "YouTube", "username": "adatube", "position": 2 },
                    ],
                }))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers()
                .get(header::CACHE_CONTROL)
                .and_then(|v| v.to_str().ok()),
            Some("no-store")
        );
        let body: LinkCollectionResponse = actix_test::read_body_json(res).await;
        assert_eq!(body.revision, 2);
        let ids: Vec<i64> = body.links.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![5, 9]);
    }

    #[actix_web::test]
    async fn invalid_rows_never_reach_the_service() {
        let mut command = MockLinksCommand::new();
        command.expect_save().never();
        let app = links_app!(state(command, MockLinksQuery::new()));
        let cookie = logged_in_cookie(&app, OWNER).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri("/api/v1/users/me/links")
                .cookie(cookie)
                .set_json(json!({
                    "expectedRevision": 0,
                    "links": [{ "id": -1, "website": "MySpace", "username": "ada" }],
                }))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Error = actix_test::read_body_json(res).await;
        assert_eq!(
            body.details().and_then(|d| d.get("code")),
            Some(&json!("unknown_platform"))
        );
    }

    #[rstest]
    #[case::foreign(Error::forbidden("link 3 is not owned by the caller"), StatusCode::FORBIDDEN)]
    #[case::stale(Error::conflict("revision mismatch"), StatusCode::CONFLICT)]
    #[case::down(Error::service_unavailable("retry"), StatusCode::SERVICE_UNAVAILABLE)]
    #[actix_web::test]
    async fn service_errors_map_to_statuses(#[case] err: Error, #[case] status: StatusCode) {
        let mut command = MockLinksCommand::new();
        command
            .expect_save()
            .times(1)
            .returning(move |_, _| Err(err.clone()));
        let app = links_app!(state(command, MockLinksQuery::new()));
        let cookie = logged_in_cookie(&app, OWNER).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri("/api/v1/users/me/links")
                .cookie(cookie)
                .set_json(json!({ "expectedRevision": 1, "links": [] }))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), status);
    }

    #[actix_web::test]
    async fn public_read_needs_no_session() {
        let mut query = MockLinksQuery::new();
        query
            .expect_fetch()
            .withf(|owner_id| owner_id.to_string() == OWNER)
            .times(1)
            .returning(|_| Ok(collection(1, vec![stored(1, Platform::Twitch, "ada", 1)])));
        let app = links_app!(state(MockLinksCommand::new(), query));

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/users/{OWNER}/links"))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: LinkCollectionResponse = actix_test::read_body_json(res).await;
        assert_eq!(body.links[0].url, "https://www.twitch.tv/ada");
    }

    #[actix_web::test]
    async fn public_read_of_a_never_saved_owner_is_not_found() {
        let mut query = MockLinksQuery::new();
        query
            .expect_fetch()
            .times(1)
            .returning(|owner_id| Ok(LinkCollection::empty(owner_id.clone())));
        let app = links_app!(state(MockLinksCommand::new(), query));

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/users/{OWNER}/links"))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["code"], "not_found");
        assert_eq!(body["details"]["code"], "unknown_owner");
    }

    #[actix_web::test]
    async fn public_read_of_a_cleared_list_is_empty() {
        let mut query = MockLinksQuery::new();
        query
            .expect_fetch()
            .times(1)
            .returning(|_| Ok(collection(2, Vec::new())));
        let app = links_app!(state(MockLinksCommand::new(), query));

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/users/{OWNER}/links"))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: LinkCollectionResponse = actix_test::read_body_json(res).await;
        assert!(body.links.is_empty());
    }

    #[actix_web::test]
    async fn public_read_rejects_malformed_owner_ids() {
        let app = links_app!(state(MockLinksCommand::new(), MockLinksQuery::new()));
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/users/not-a-uuid/links")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}

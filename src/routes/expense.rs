use crate::error::app_error::AppError;
use crate::error::json::JsonBody;
use crate::models::draft::{DraftFieldUpdate, DraftMode, DraftResponse, SaveResponse, SaveStatus};
use crate::models::expense::{CategoryResponse, DeleteResponse, ExpenseCategory, ExpenseId, ExpenseListResponse, ExpenseResponse};
use crate::models::view::{FilterRequest, FilterResponse, ViewStateResponse};
use crate::service::expense_manager::{ExpenseManager, SaveOutcome};
use crate::state::AppState;
use chrono::{NaiveDate, Utc};
use rocket::serde::json::Json;
use rocket::{State, delete, get, patch, post, put};
use rocket_okapi::openapi;

fn parse_expense_id(raw: &str) -> Result<ExpenseId, AppError> {
    raw.trim().parse().map_err(|_| AppError::BadRequest(format!("Invalid expense id: {}", raw)))
}

/// `YYYY-MM-DD`; an empty value clears the date filter.
fn parse_filter_date(raw: &str) -> Result<Option<NaiveDate>, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| AppError::BadRequest(format!("Invalid date: {}", raw)))
}

fn draft_or_conflict(manager: &ExpenseManager) -> Result<DraftResponse, AppError> {
    manager
        .draft_response()
        .ok_or_else(|| AppError::Conflict("No expense draft is open".to_string()))
}

fn list_response(manager: &ExpenseManager) -> ExpenseListResponse {
    let rows = manager.rows();
    ExpenseListResponse {
        total: rows.len(),
        rows,
        search_query: manager.filter().search_query().to_string(),
        filter_date: manager.filter().filter_date(),
    }
}

impl From<&SaveOutcome> for SaveResponse {
    fn from(outcome: &SaveOutcome) -> Self {
        match outcome {
            SaveOutcome::Created(record) => SaveResponse {
                status: SaveStatus::Created,
                expense_id: record.id,
                expense: Some(ExpenseResponse::from(record)),
            },
            SaveOutcome::Updated(record) => SaveResponse {
                status: SaveStatus::Updated,
                expense_id: record.id,
                expense: Some(ExpenseResponse::from(record)),
            },
            SaveOutcome::TargetMissing(id) => SaveResponse {
                status: SaveStatus::TargetMissing,
                expense_id: *id,
                expense: None,
            },
        }
    }
}

/// Filtered expense rows.
///
/// `search` and `date` are shorthand for `PUT /filters`: when present they replace the
/// stored filters, which then stay in effect for later requests and for `/state`. Omit both
/// to read the list under the current filters. An empty `date` clears the date filter.
#[openapi(tag = "Expenses")]
#[get("/?<search>&<date>")]
pub async fn list_expenses(state: &State<AppState>, search: Option<String>, date: Option<String>) -> Result<Json<ExpenseListResponse>, AppError> {
    let filter_date = date.as_deref().map(parse_filter_date).transpose()?;

    let mut manager = state.manager()?;
    if let Some(search) = search {
        manager.set_search_query(&search);
    }
    if let Some(filter_date) = filter_date {
        manager.set_filter_date(filter_date);
    }

    Ok(Json(list_response(&manager)))
}

/// Categories offered by the expense form
#[openapi(tag = "Expenses")]
#[get("/categories")]
pub async fn list_categories() -> Json<Vec<CategoryResponse>> {
    Json(ExpenseCategory::ALL.into_iter().map(CategoryResponse::from).collect())
}

#[openapi(tag = "Expenses")]
#[get("/state")]
pub async fn get_view_state(state: &State<AppState>) -> Result<Json<ViewStateResponse>, AppError> {
    let manager = state.manager()?;
    Ok(Json(manager.view_state()))
}

#[openapi(tag = "Expenses")]
#[put("/filters", data = "<payload>")]
pub async fn put_filters(state: &State<AppState>, payload: JsonBody<FilterRequest>) -> Result<Json<FilterResponse>, AppError> {
    let request = payload.into_inner();
    let mut manager = state.manager()?;
    manager.set_search_query(&request.search_query);
    manager.set_filter_date(request.filter_date);

    Ok(Json(FilterResponse {
        search_query: manager.filter().search_query().to_string(),
        filter_date: manager.filter().filter_date(),
    }))
}

/// Open the modal on a blank draft
#[openapi(tag = "Expense draft")]
#[post("/draft")]
pub async fn start_create(state: &State<AppState>) -> Result<Json<DraftResponse>, AppError> {
    let mut manager = state.manager()?;
    let draft = manager.start_create(Utc::now());
    Ok(Json(DraftResponse::new(DraftMode::Create, &draft)))
}

/// Open the modal on a copy of an existing expense
#[openapi(tag = "Expense draft")]
#[post("/<id>/edit")]
pub async fn start_edit(state: &State<AppState>, id: &str) -> Result<Json<DraftResponse>, AppError> {
    let id = parse_expense_id(id)?;
    let mut manager = state.manager()?;
    let draft = manager.start_edit(id)?;
    Ok(Json(DraftResponse::new(DraftMode::Edit, &draft)))
}

/// Change one field of the open draft
#[openapi(tag = "Expense draft")]
#[patch("/draft", data = "<payload>")]
pub async fn update_draft(state: &State<AppState>, payload: JsonBody<DraftFieldUpdate>) -> Result<Json<DraftResponse>, AppError> {
    let mut manager = state.manager()?;
    manager.update_draft(payload.into_inner())?;
    Ok(Json(draft_or_conflict(&manager)?))
}

/// Commit the open draft and close the modal
#[openapi(tag = "Expense draft")]
#[post("/draft/save")]
pub async fn save_draft(state: &State<AppState>) -> Result<Json<SaveResponse>, AppError> {
    let mut manager = state.manager()?;
    let outcome = manager.save_draft(Utc::now())?;
    Ok(Json(SaveResponse::from(&outcome)))
}

/// Close the modal without saving
#[openapi(tag = "Expense draft")]
#[delete("/draft")]
pub async fn cancel_draft(state: &State<AppState>) -> Result<Json<ViewStateResponse>, AppError> {
    let mut manager = state.manager()?;
    manager.cancel_draft();
    Ok(Json(manager.view_state()))
}

/// Ask for confirmation before deleting an expense
#[openapi(tag = "Expense deletion")]
#[post("/<id>/delete")]
pub async fn request_delete(state: &State<AppState>, id: &str) -> Result<Json<ViewStateResponse>, AppError> {
    let id = parse_expense_id(id)?;
    let mut manager = state.manager()?;
    manager.request_delete(id);
    Ok(Json(manager.view_state()))
}

#[openapi(tag = "Expense deletion")]
#[post("/delete/confirm")]
pub async fn confirm_delete(state: &State<AppState>) -> Result<Json<DeleteResponse>, AppError> {
    let mut manager = state.manager()?;
    let deleted = manager.confirm_delete();
    Ok(Json(DeleteResponse {
        deleted: deleted.as_ref().map(ExpenseResponse::from),
    }))
}

#[openapi(tag = "Expense deletion")]
#[post("/delete/cancel")]
pub async fn cancel_delete(state: &State<AppState>) -> Result<Json<ViewStateResponse>, AppError> {
    let mut manager = state.manager()?;
    manager.cancel_delete();
    Ok(Json(manager.view_state()))
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![
        list_expenses,
        list_categories,
        get_view_state,
        put_filters,
        start_create,
        start_edit,
        update_draft,
        save_draft,
        cancel_draft,
        request_delete,
        confirm_delete,
        cancel_delete
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, build_rocket};
    use rocket::http::{ContentType, Status};
    use rocket::local::asynchronous::Client;
    use serde_json::Value;

    async fn client() -> Client {
        Client::tracked(build_rocket(Config::for_tests())).await.expect("valid rocket instance")
    }

    async fn json(client: &Client, uri: &str) -> Value {
        let response = client.get(uri).dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        response.into_json::<Value>().await.expect("json body")
    }

    fn names(list: &Value) -> Vec<String> {
        list["rows"]
            .as_array()
            .expect("rows")
            .iter()
            .map(|row| row["name"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn expense_ids_must_be_numbers() {
        assert_eq!(parse_expense_id(" 42 ").expect("valid id"), 42);
        assert!(matches!(parse_expense_id("abc"), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn empty_date_clears_the_filter() {
        assert_eq!(parse_filter_date("").expect("empty is fine"), None);
        assert_eq!(parse_filter_date("2026-10-16").expect("valid date"), NaiveDate::from_ymd_opt(2026, 10, 16));
        assert!(parse_filter_date("16/10/2026").is_err());
    }

    #[rocket::async_test]
    async fn seeded_list_and_sticky_search() {
        let client = client().await;

        let list = json(&client, "/api/expenses").await;
        assert_eq!(list["total"], 2);
        assert_eq!(names(&list), vec!["Rohan", "PeerXP"]);

        let list = json(&client, "/api/expenses?search=ROH").await;
        assert_eq!(names(&list), vec!["Rohan"]);

        // the query stays in effect until replaced
        let list = json(&client, "/api/expenses").await;
        assert_eq!(list["search_query"], "ROH");
        assert_eq!(list["total"], 1);

        let list = json(&client, "/api/expenses?search=").await;
        assert_eq!(list["total"], 2);
    }

    #[rocket::async_test]
    async fn date_filter_through_put() {
        let client = client().await;

        let response = client
            .put("/api/expenses/filters")
            .header(ContentType::JSON)
            .body(r#"{"search_query":"","filter_date":"1999-01-01"}"#)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        assert_eq!(json(&client, "/api/expenses").await["total"], 0);

        let list = json(&client, "/api/expenses?date=").await;
        assert_eq!(list["total"], 2);
        assert_eq!(list["filter_date"], Value::Null);

        let response = client.get("/api/expenses?date=yesterday").dispatch().await;
        assert_eq!(response.status(), Status::BadRequest);
    }

    #[rocket::async_test]
    async fn create_flow_appends_one_record() {
        let client = client().await;

        let response = client.post("/api/expenses/draft").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let draft = response.into_json::<Value>().await.expect("draft");
        assert_eq!(draft["mode"], "create");
        assert_eq!(draft["title"], "Create Expense");
        assert_eq!(draft["name"], "");

        let response = client
            .patch("/api/expenses/draft")
            .header(ContentType::JSON)
            .body(r#"{"field":"name","value":"Groceries"}"#)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        let draft = response.into_json::<Value>().await.expect("draft");
        assert_eq!(draft["name"], "Groceries");

        let state = json(&client, "/api/expenses/state").await;
        assert_eq!(state["is_modal_open"], true);
        assert_eq!(state["is_editing"], false);

        let response = client.post("/api/expenses/draft/save").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let saved = response.into_json::<Value>().await.expect("save response");
        assert_eq!(saved["status"], "created");
        assert_eq!(saved["expense"]["name"], "Groceries");

        let list = json(&client, "/api/expenses").await;
        assert_eq!(names(&list), vec!["Rohan", "PeerXP", "Groceries"]);
        assert_eq!(json(&client, "/api/expenses/state").await["is_modal_open"], false);
    }

    #[rocket::async_test]
    async fn edit_flow_replaces_in_place() {
        let client = client().await;

        let response = client.post("/api/expenses/1/edit").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let draft = response.into_json::<Value>().await.expect("draft");
        assert_eq!(draft["title"], "Edit Expense");
        assert_eq!(draft["amount"], 100.0);

        client
            .patch("/api/expenses/draft")
            .header(ContentType::JSON)
            .body(r#"{"field":"amount","value":500}"#)
            .dispatch()
            .await;
        let saved = client
            .post("/api/expenses/draft/save")
            .dispatch()
            .await
            .into_json::<Value>()
            .await
            .expect("save response");
        assert_eq!(saved["status"], "updated");
        assert_eq!(saved["expense_id"], 1);

        let list = json(&client, "/api/expenses").await;
        assert_eq!(list["total"], 2);
        assert_eq!(list["rows"][0]["amount"], 500.0);
        assert_eq!(list["rows"][0]["created_by"], "user1@example.com");
    }

    #[rocket::async_test]
    async fn fractional_amounts_are_stored_as_entered() {
        let client = client().await;
        client.post("/api/expenses/draft").dispatch().await;

        let response = client
            .patch("/api/expenses/draft")
            .header(ContentType::JSON)
            .body(r#"{"field":"amount","value":99.5}"#)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        assert_eq!(response.into_json::<Value>().await.expect("draft")["amount"], 99.5);

        let saved = client
            .post("/api/expenses/draft/save")
            .dispatch()
            .await
            .into_json::<Value>()
            .await
            .expect("save response");
        assert_eq!(saved["expense"]["amount"], 99.5);

        let list = json(&client, "/api/expenses").await;
        assert_eq!(list["rows"][2]["amount"], 99.5);
    }

    #[rocket::async_test]
    async fn draft_operations_need_an_open_modal() {
        let client = client().await;

        assert_eq!(client.post("/api/expenses/draft/save").dispatch().await.status(), Status::Conflict);

        let response = client
            .patch("/api/expenses/draft")
            .header(ContentType::JSON)
            .body(r#"{"field":"name","value":"nobody home"}"#)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Conflict);

        assert_eq!(client.post("/api/expenses/404/edit").dispatch().await.status(), Status::NotFound);
        assert_eq!(client.post("/api/expenses/abc/edit").dispatch().await.status(), Status::BadRequest);
    }

    #[rocket::async_test]
    async fn malformed_field_update_is_unprocessable() {
        let client = client().await;
        client.post("/api/expenses/draft").dispatch().await;

        let response = client
            .patch("/api/expenses/draft")
            .header(ContentType::JSON)
            .body(r#"{"field":"created_by","value":"mallory"}"#)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::UnprocessableEntity);
        let body = response.into_json::<Value>().await.expect("catcher body");
        assert!(body["message"].is_string());
    }

    #[rocket::async_test]
    async fn cancelled_delete_keeps_everything() {
        let client = client().await;

        let state = client
            .post("/api/expenses/2/delete")
            .dispatch()
            .await
            .into_json::<Value>()
            .await
            .expect("view state");
        assert_eq!(state["is_delete_confirmation_open"], true);
        assert_eq!(state["delete_expense_id"], 2);

        let state = client
            .post("/api/expenses/delete/cancel")
            .dispatch()
            .await
            .into_json::<Value>()
            .await
            .expect("view state");
        assert_eq!(state["is_delete_confirmation_open"], false);
        assert_eq!(state["delete_expense_id"], Value::Null);

        assert_eq!(json(&client, "/api/expenses").await["total"], 2);
    }

    #[rocket::async_test]
    async fn confirmed_delete_removes_exactly_one() {
        let client = client().await;

        client.post("/api/expenses/1/delete").dispatch().await;
        let deleted = client
            .post("/api/expenses/delete/confirm")
            .dispatch()
            .await
            .into_json::<Value>()
            .await
            .expect("delete response");
        assert_eq!(deleted["deleted"]["name"], "Rohan");
        assert_eq!(names(&json(&client, "/api/expenses").await), vec!["PeerXP"]);

        // nothing remembered any more
        let deleted = client
            .post("/api/expenses/delete/confirm")
            .dispatch()
            .await
            .into_json::<Value>()
            .await
            .expect("delete response");
        assert_eq!(deleted["deleted"], Value::Null);
        assert_eq!(json(&client, "/api/expenses").await["total"], 1);
    }

    #[rocket::async_test]
    async fn category_catalogue_is_fixed() {
        let client = client().await;
        let categories = json(&client, "/api/expenses/categories").await;
        let labels: Vec<&str> = categories
            .as_array()
            .expect("array")
            .iter()
            .map(|c| c["label"].as_str().unwrap_or_default())
            .collect();
        assert_eq!(labels, vec!["Health", "Electronics", "Travel", "Education", "Books", "Others"]);
    }
}

//! Company routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use database::company::{self, CompanyChanges, NewCompany};
use database::{validation, Company, CompanyStatus};
use serde::Deserialize;

use crate::error::Result;
use crate::state::AppState;

/// Request to create a company.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompanyRequest {
    pub name: String,
    pub industry: String,
    #[serde(default)]
    pub status: Option<CompanyStatus>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Request to update a company; omitted fields are left unchanged.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCompanyRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub status: Option<CompanyStatus>,
    #[serde(default)]
    pub description: Option<String>,
}

/// List all companies.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Company>>> {
    let companies = company::list_companies(state.db.pool()).await?;
    Ok(Json(companies))
}

/// Create a company.
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateCompanyRequest>,
) -> Result<(StatusCode, Json<Company>)> {
    validation::validate_required("name", &req.name)?;
    validation::validate_required("industry", &req.industry)?;
    if let Some(ref description) = req.description {
        validation::validate_text("description", description)?;
    }

    let created = company::create_company(
        state.db.pool(),
        NewCompany {
            name: req.name.trim().to_string(),
            industry: req.industry.trim().to_string(),
            status: req.status,
            description: req.description,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a company.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateCompanyRequest>,
) -> Result<Json<Company>> {
    if let Some(ref name) = req.name {
        validation::validate_required("name", name)?;
    }
    if let Some(ref industry) = req.industry {
        validation::validate_required("industry", industry)?;
    }
    if let Some(ref description) = req.description {
        validation::validate_text("description", description)?;
    }

    let updated = company::update_company(
        state.db.pool(),
        &id,
        CompanyChanges {
            name: req.name,
            industry: req.industry,
            status: req.status,
            description: req.description,
        },
    )
    .await?;

    Ok(Json(updated))
}

//! Company CRUD operations.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{DatabaseError, Result};
use crate::models::{Company, CompanyStatus};

/// Fields for creating a company.
#[derive(Debug, Clone)]
pub struct NewCompany {
    pub name: String,
    pub industry: String,
    pub status: Option<CompanyStatus>,
    pub description: Option<String>,
}

/// Partial update for a company; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct CompanyChanges {
    pub name: Option<String>,
    pub industry: Option<String>,
    pub status: Option<CompanyStatus>,
    pub description: Option<String>,
}

/// Create a new company and return the stored row.
pub async fn create_company(pool: &SqlitePool, new: NewCompany) -> Result<Company> {
    let company = Company {
        id: Uuid::new_v4().to_string(),
        name: new.name,
        industry: new.industry,
        status: new.status.unwrap_or(CompanyStatus::Active),
        description: new.description,
        created_at: chrono::Utc::now().to_rfc3339(),
        updated_at: chrono::Utc::now().to_rfc3339(),
    };

    sqlx::query(
        r#"
        INSERT INTO companies (id, name, industry, status, description, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&company.id)
    .bind(&company.name)
    .bind(&company.industry)
    .bind(company.status)
    .bind(&company.description)
    .bind(&company.created_at)
    .bind(&company.updated_at)
    .execute(pool)
    .await?;

    Ok(company)
}

/// Get a company by ID.
pub async fn get_company(pool: &SqlitePool, id: &str) -> Result<Company> {
    sqlx::query_as::<_, Company>(
        r#"
        SELECT id, name, industry, status, description, created_at, updated_at
        FROM companies
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Company",
        id: id.to_string(),
    })
}

/// Apply a partial update to a company and return the updated row.
pub async fn update_company(
    pool: &SqlitePool,
    id: &str,
    changes: CompanyChanges,
) -> Result<Company> {
    let mut company = get_company(pool, id).await?;

    if let Some(name) = changes.name {
        company.name = name;
    }
    if let Some(industry) = changes.industry {
        company.industry = industry;
    }
    if let Some(status) = changes.status {
        company.status = status;
    }
    if let Some(description) = changes.description {
        company.description = Some(description);
    }
    company.updated_at = chrono::Utc::now().to_rfc3339();

    let result = sqlx::query(
        r#"
        UPDATE companies
        SET name = ?, industry = ?, status = ?, description = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&company.name)
    .bind(&company.industry)
    .bind(company.status)
    .bind(&company.description)
    .bind(&company.updated_at)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Company",
            id: id.to_string(),
        });
    }

    Ok(company)
}

/// List all companies, sorted by name.
pub async fn list_companies(pool: &SqlitePool) -> Result<Vec<Company>> {
    let companies = sqlx::query_as::<_, Company>(
        r#"
        SELECT id, name, industry, status, description, created_at, updated_at
        FROM companies
        ORDER BY name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(companies)
}

// Company data models and DTOs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::{fmt, str::FromStr};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::error::ApiError;
use crate::validation::{one_of, Bindable, COMPANY_TYPE_ONE_OF};

/// Closed set of company types, spelled on the wire as the clients send them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum CompanyType {
    #[serde(rename = "Corporations")]
    Corporation,
    #[serde(rename = "NonProfit")]
    NonProfit,
    #[serde(rename = "Cooperative")]
    Cooperative,
    #[serde(rename = "Sole Proprietorship")]
    SoleProprietorship,
}

impl CompanyType {
    pub const ALL: [CompanyType; 4] = [
        CompanyType::Corporation,
        CompanyType::NonProfit,
        CompanyType::Cooperative,
        CompanyType::SoleProprietorship,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CompanyType::Corporation => "Corporations",
            CompanyType::NonProfit => "NonProfit",
            CompanyType::Cooperative => "Cooperative",
            CompanyType::SoleProprietorship => "Sole Proprietorship",
        }
    }

    pub fn wire_names() -> [&'static str; 4] {
        Self::ALL.map(|t| t.as_str())
    }
}

impl fmt::Display for CompanyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompanyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown company type '{}'", s))
    }
}

/// Company as stored and returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Company {
    pub id: Uuid,
    #[schema(example = "Acme")]
    pub name: String,
    #[schema(example = "Makes anvils")]
    pub description: String,
    #[schema(example = 10)]
    pub amount_employees: i32,
    #[schema(example = true)]
    pub registered: bool,
    #[serde(rename = "type")]
    pub company_type: CompanyType,
}

impl Company {
    /// Build the record stored at `id` from resolver input
    pub fn from_input(id: Uuid, input: CompanyInput) -> Self {
        Self {
            id,
            name: input.name,
            description: input.description,
            amount_employees: input.amount_employees,
            registered: input.registered,
            company_type: input.company_type,
        }
    }
}

/// Raw company row; `type` is kept as text until it is checked against the enum
#[derive(Debug, Clone, FromRow)]
pub struct CompanyRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub amount_employees: i32,
    pub registered: bool,
    #[sqlx(rename = "type")]
    pub company_type: String,
}

impl TryFrom<CompanyRow> for Company {
    type Error = ApiError;

    fn try_from(row: CompanyRow) -> Result<Self, Self::Error> {
        let company_type = row.company_type.parse::<CompanyType>().map_err(|e| {
            ApiError::internal(format!("company '{}' has an invalid stored type: {}", row.id, e))
        })?;

        Ok(Self {
            id: row.id,
            name: row.name,
            description: row.description,
            amount_employees: row.amount_employees,
            registered: row.registered,
            company_type,
        })
    }
}

/// Request body for creating or replacing a company
///
/// `amount_employees` and `registered` are optional at the serde level so a
/// missing value is distinguishable from zero/false and reported as required.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CompanyRequest {
    #[serde(default)]
    #[validate(length(min = 1, code = "required"))]
    #[schema(example = "Acme")]
    pub name: String,
    #[serde(default)]
    #[schema(example = "Makes anvils")]
    pub description: String,
    #[validate(required)]
    #[schema(example = 10)]
    pub amount_employees: Option<i32>,
    #[validate(required)]
    #[schema(example = true)]
    pub registered: Option<bool>,
    #[serde(default, rename = "type")]
    #[validate(length(min = 1, code = "required"), custom = "validate_company_type")]
    #[schema(example = "Corporations")]
    pub company_type: String,
}

impl Bindable for CompanyRequest {
    fn wire_name(field: &'static str) -> &'static str {
        match field {
            "company_type" => "type",
            other => other,
        }
    }
}

fn validate_company_type(value: &str) -> Result<(), ValidationError> {
    one_of(value, &CompanyType::wire_names()).map_err(|_| ValidationError::new(COMPANY_TYPE_ONE_OF))
}

/// Validated resolver input; every field of a company except its id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyInput {
    pub name: String,
    pub description: String,
    pub amount_employees: i32,
    pub registered: bool,
    pub company_type: CompanyType,
}

impl TryFrom<CompanyRequest> for CompanyInput {
    type Error = ApiError;

    fn try_from(request: CompanyRequest) -> Result<Self, Self::Error> {
        let amount_employees = request
            .amount_employees
            .ok_or_else(|| ApiError::InvalidBody("amount_employees is required".to_string()))?;
        let registered = request
            .registered
            .ok_or_else(|| ApiError::InvalidBody("registered is required".to_string()))?;
        let company_type = request
            .company_type
            .parse::<CompanyType>()
            .map_err(ApiError::InvalidBody)?;

        Ok(Self {
            name: request.name,
            description: request.description,
            amount_employees,
            registered,
            company_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::decode;

    fn invalid_body(err: ApiError) -> String {
        match err {
            ApiError::InvalidBody(msg) => msg,
            other => panic!("expected InvalidBody, got {:?}", other),
        }
    }

    #[test]
    fn test_company_type_wire_names_round_trip() {
        for t in CompanyType::ALL {
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.as_str()));
            assert_eq!(t.as_str().parse::<CompanyType>().unwrap(), t);
        }
        assert!("sole_proprietorship".parse::<CompanyType>().is_err());
    }

    #[test]
    fn test_company_serializes_type_field() {
        let company = Company {
            id: Uuid::new_v4(),
            name: "Acme".to_string(),
            description: String::new(),
            amount_employees: 10,
            registered: true,
            company_type: CompanyType::SoleProprietorship,
        };
        let value = serde_json::to_value(&company).unwrap();
        assert_eq!(value["type"], "Sole Proprietorship");
        assert_eq!(value["amount_employees"], 10);
        assert_eq!(value["registered"], true);
    }

    #[test]
    fn test_zero_employees_is_accepted() {
        let request = decode::<CompanyRequest>(
            br#"{"name":"Acme","amount_employees":0,"registered":false,"type":"NonProfit"}"#,
        )
        .unwrap();
        let input = CompanyInput::try_from(request).unwrap();
        assert_eq!(input.amount_employees, 0);
        assert!(!input.registered);
        assert_eq!(input.company_type, CompanyType::NonProfit);
    }

    #[test]
    fn test_missing_employee_count_is_required() {
        let err = decode::<CompanyRequest>(
            br#"{"name":"Acme","registered":true,"type":"Cooperative"}"#,
        )
        .unwrap_err();
        assert_eq!(invalid_body(err), "amount_employees is required");
    }

    #[test]
    fn test_unknown_type_lists_company_types() {
        let err = decode::<CompanyRequest>(
            br#"{"name":"Acme","amount_employees":1,"registered":true,"type":"LLC"}"#,
        )
        .unwrap_err();
        assert_eq!(
            invalid_body(err),
            "type must be one of: Corporations, NonProfit, Cooperative, Sole Proprietorship"
        );
    }

    #[test]
    fn test_missing_name_is_required() {
        let err = decode::<CompanyRequest>(
            br#"{"amount_employees":1,"registered":true,"type":"Corporations"}"#,
        )
        .unwrap_err();
        assert_eq!(invalid_body(err), "name is required");
    }

    #[test]
    fn test_row_with_unknown_type_is_internal_error() {
        let row = CompanyRow {
            id: Uuid::new_v4(),
            name: "Acme".to_string(),
            description: String::new(),
            amount_employees: 1,
            registered: true,
            company_type: "Partnership".to_string(),
        };
        let err = Company::try_from(row).unwrap_err();
        assert_eq!(err.code(), "INTERNAL_SERVER_ERROR");
    }
}

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::schema::{FieldDef, FieldType, ObjectSchema};

/// A top-level menu category as persisted in the `category` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub image: String,
    pub description: String,
    pub taxable: bool,
    pub tax: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated creation payload. Optional fields fall back to the store
/// defaults (taxable true, tax 0).
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryDraft {
    pub name: String,
    pub image: String,
    pub description: String,
    #[serde(default)]
    pub taxable: Option<bool>,
    #[serde(default)]
    pub tax: Option<Decimal>,
}

/// Validated partial update; only supplied fields are written.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub taxable: Option<bool>,
    pub tax: Option<Decimal>,
}

impl CategoryPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.image.is_none()
            && self.description.is_none()
            && self.taxable.is_none()
            && self.tax.is_none()
    }
}

const CATEGORY_FIELDS: &[FieldDef] = &[
    FieldDef {
        name: "name",
        ty: FieldType::Text,
    },
    FieldDef {
        name: "image",
        ty: FieldType::Text,
    },
    FieldDef {
        name: "description",
        ty: FieldType::Text,
    },
    FieldDef {
        name: "taxable",
        ty: FieldType::Boolean,
    },
    FieldDef {
        name: "tax",
        ty: FieldType::Money,
    },
];

pub static CATEGORY_CREATE: ObjectSchema = ObjectSchema {
    fields: CATEGORY_FIELDS,
    required: &["name", "image", "description"],
};

pub static CATEGORY_UPDATE: ObjectSchema = ObjectSchema {
    fields: CATEGORY_FIELDS,
    required: &[],
};

pub static CATEGORY_GET: ObjectSchema = ObjectSchema {
    fields: &[
        FieldDef {
            name: "id",
            ty: FieldType::Integer,
        },
        FieldDef {
            name: "name",
            ty: FieldType::Text,
        },
        FieldDef {
            name: "taxable",
            ty: FieldType::Boolean,
        },
    ],
    required: &[],
};

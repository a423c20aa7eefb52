use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::schema::{FieldDef, FieldType, ObjectSchema};

/// A subcategory nested under a category (`subcategory` table). The foreign
/// reference is nullable and unenforced at the store level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Subcategory {
    pub id: i64,
    pub category_id: Option<i64>,
    pub name: String,
    pub image: String,
    pub description: String,
    pub taxable: bool,
    pub tax: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated creation payload. `category_id` is injected from the creation
/// route, overriding any body-supplied value.
#[derive(Debug, Clone, Deserialize)]
pub struct SubcategoryDraft {
    pub name: String,
    pub image: String,
    pub description: String,
    #[serde(default)]
    pub taxable: Option<bool>,
    #[serde(default)]
    pub tax: Option<Decimal>,
    #[serde(default)]
    pub category_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubcategoryPatch {
    pub name: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub taxable: Option<bool>,
    pub tax: Option<Decimal>,
    pub category_id: Option<i64>,
}

const SUBCATEGORY_FIELDS: &[FieldDef] = &[
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
    FieldDef {
        name: "category_id",
        ty: FieldType::Integer,
    },
];

pub static SUBCATEGORY_CREATE: ObjectSchema = ObjectSchema {
    fields: SUBCATEGORY_FIELDS,
    required: &["name", "image", "description"],
};

pub static SUBCATEGORY_UPDATE: ObjectSchema = ObjectSchema {
    fields: SUBCATEGORY_FIELDS,
    required: &[],
};

pub static SUBCATEGORY_GET: ObjectSchema = ObjectSchema {
    fields: &[
        FieldDef {
            name: "id",
            ty: FieldType::Integer,
        },
        FieldDef {
            name: "category_id",
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

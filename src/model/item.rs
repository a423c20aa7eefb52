use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::schema::{FieldDef, FieldType, ObjectSchema};

/// A menu item (`items` table). Exactly one of `subcategory_id` and
/// `category_id` is populated, depending on which creation route matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Item {
    pub id: i64,
    pub subcategory_id: Option<i64>,
    pub category_id: Option<i64>,
    pub name: String,
    pub image: String,
    pub description: String,
    pub taxable: bool,
    pub tax: Decimal,
    pub base_amount: Decimal,
    pub discount: Decimal,
    pub total_amount: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated creation payload. The foreign key is injected from the matched
/// route; `total_amount` is derived when absent.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemDraft {
    pub name: String,
    pub image: String,
    pub description: String,
    pub taxable: bool,
    pub tax: Decimal,
    pub base_amount: Decimal,
    pub discount: Decimal,
    #[serde(default)]
    pub total_amount: Option<Decimal>,
    #[serde(default)]
    pub subcategory_id: Option<i64>,
    #[serde(default)]
    pub category_id: Option<i64>,
}

/// Validated update payload. The pricing fields stay required so the derived
/// total is well-defined on every patch; the rest is optional.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub taxable: Option<bool>,
    pub tax: Option<Decimal>,
    pub base_amount: Decimal,
    pub discount: Decimal,
    #[serde(default)]
    pub total_amount: Option<Decimal>,
}

const ITEM_FIELDS: &[FieldDef] = &[
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
        name: "base_amount",
        ty: FieldType::Money,
    },
    FieldDef {
        name: "discount",
        ty: FieldType::Money,
    },
    FieldDef {
        name: "total_amount",
        ty: FieldType::Money,
    },
    FieldDef {
        name: "subcategory_id",
        ty: FieldType::Integer,
    },
    FieldDef {
        name: "category_id",
        ty: FieldType::Integer,
    },
];

pub static ITEM_CREATE: ObjectSchema = ObjectSchema {
    fields: ITEM_FIELDS,
    required: &[
        "name",
        "image",
        "description",
        "taxable",
        "tax",
        "base_amount",
        "discount",
    ],
};

// The foreign key does not move on update, so it is absent here.
pub static ITEM_UPDATE: ObjectSchema = ObjectSchema {
    fields: &[
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
            name: "base_amount",
            ty: FieldType::Money,
        },
        FieldDef {
            name: "discount",
            ty: FieldType::Money,
        },
        FieldDef {
            name: "total_amount",
            ty: FieldType::Money,
        },
    ],
    required: &["base_amount", "discount"],
};

pub static ITEM_GET: ObjectSchema = ObjectSchema {
    fields: &[
        FieldDef {
            name: "id",
            ty: FieldType::Integer,
        },
        FieldDef {
            name: "subcategory_id",
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

//! Reassembly of joined pickup-point rows into a nested tree
//!
//! The joined listing returns one row per (pickup point, reception, product)
//! combination, with NULL reception/product columns where a LEFT JOIN found
//! nothing. Rows arrive already ordered; first-seen order is kept at every
//! level and each child lands under its own parent exactly once.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::{Product, Pvz, PvzInfo, Reception, ReceptionInfo, ReceptionStatus};

/// One row of the pickup-point / reception / product join
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PvzTreeRow {
    pub pvz_id: Uuid,
    pub pvz_registration_date: DateTime<Utc>,
    pub pvz_city: String,
    pub reception_id: Option<Uuid>,
    pub reception_date_time: Option<DateTime<Utc>>,
    pub reception_status: Option<ReceptionStatus>,
    pub product_id: Option<Uuid>,
    pub product_date_time: Option<DateTime<Utc>>,
    pub product_type: Option<String>,
}

/// Fold joined rows into pickup point → receptions → products
pub fn assemble_pvz_tree<I>(rows: I) -> Vec<PvzInfo>
where
    I: IntoIterator<Item = PvzTreeRow>,
{
    let mut tree: Vec<PvzInfo> = Vec::new();
    let mut pvz_index: HashMap<Uuid, usize> = HashMap::new();
    let mut reception_index: HashMap<Uuid, (usize, usize)> = HashMap::new();

    for row in rows {
        let pvz_pos = *pvz_index.entry(row.pvz_id).or_insert_with(|| {
            tree.push(PvzInfo {
                pvz: Pvz {
                    id: row.pvz_id,
                    registration_date: row.pvz_registration_date,
                    city: row.pvz_city.clone(),
                },
                receptions: Vec::new(),
            });
            tree.len() - 1
        });

        let (Some(reception_id), Some(date_time), Some(status)) = (
            row.reception_id,
            row.reception_date_time,
            row.reception_status,
        ) else {
            continue;
        };

        let (pvz_pos, reception_pos) = *reception_index.entry(reception_id).or_insert_with(|| {
            let receptions = &mut tree[pvz_pos].receptions;
            receptions.push(ReceptionInfo {
                reception: Reception {
                    id: reception_id,
                    pvz_id: row.pvz_id,
                    date_time,
                    status,
                },
                products: Vec::new(),
            });
            (pvz_pos, receptions.len() - 1)
        });

        if let (Some(product_id), Some(product_date_time), Some(product_type)) =
            (row.product_id, row.product_date_time, row.product_type)
        {
            tree[pvz_pos].receptions[reception_pos]
                .products
                .push(Product {
                    id: product_id,
                    reception_id,
                    date_time: product_date_time,
                    product_type,
                });
        }
    }

    tree
}

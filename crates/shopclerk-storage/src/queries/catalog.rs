// SPDX-FileCopyrightText: 2026 Shopclerk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Catalog aggregation queries over the inventory fact table and orders.
//!
//! Counts are always derived by grouping unit rows at query time; nothing
//! stores a stock number that could drift. The group key is always the full
//! `(product_name, product_brand, product_retail_price)` triple, so the same
//! product listed at two prices stays two groups. Every grouped query carries
//! an explicit ORDER BY over that triple so LIMIT truncation is reproducible
//! across runs.

use rusqlite::params;
use shopclerk_core::{
    ClerkError, InventoryUnit, OrderRecord,
    types::{CategoryRow, ProductRow, SoldRow, StockRow},
};

use crate::database::Database;
use crate::queries::escape_like;

const ORDER_COLUMNS: &str =
    "order_id, user_id, status, num_of_item, created_at, shipped_at, delivered_at";

fn order_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<OrderRecord> {
    Ok(OrderRecord {
        order_id: row.get(0)?,
        user_id: row.get(1)?,
        status: row.get(2)?,
        num_of_item: row.get(3)?,
        created_at: row.get(4)?,
        shipped_at: row.get(5)?,
        delivered_at: row.get(6)?,
    })
}

/// Available stock for products whose name contains `name_fragment`,
/// case-insensitively. Returns at most the single best-matching group.
pub async fn stock_for_product(
    db: &Database,
    name_fragment: &str,
) -> Result<Vec<StockRow>, ClerkError> {
    let pattern = escape_like(&name_fragment.to_lowercase());
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT product_name, product_brand, product_retail_price, COUNT(*) AS stock_count
                 FROM inventory_items
                 WHERE sold_at IS NULL
                   AND LOWER(product_name) LIKE '%' || ?1 || '%' ESCAPE '\\'
                 GROUP BY product_name, product_brand, product_retail_price
                 ORDER BY stock_count DESC, product_name ASC, product_brand ASC,
                          product_retail_price ASC
                 LIMIT 1",
            )?;
            let rows = stmt.query_map(params![pattern], |row| {
                Ok(StockRow {
                    product_name: row.get(0)?,
                    product_brand: row.get(1)?,
                    product_retail_price: row.get(2)?,
                    stock_count: row.get(3)?,
                })
            })?;
            let mut out = Vec::new();
            for row in rows {
                out.push(row?);
            }
            Ok(out)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Exact point lookup of an order by id.
pub async fn order_by_id(db: &Database, order_id: &str) -> Result<Option<OrderRecord>, ClerkError> {
    let order_id = order_id.to_string();
    db.connection()
        .call(move |conn| {
            match conn.query_row(
                &format!("SELECT {ORDER_COLUMNS} FROM orders WHERE order_id = ?1"),
                params![order_id],
                order_from_row,
            ) {
                Ok(order) => Ok(Some(order)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Best-selling products by sold-unit count, name/brand tie-break.
pub async fn top_sold_products(db: &Database, limit: i64) -> Result<Vec<SoldRow>, ClerkError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT product_name, product_brand, product_retail_price, COUNT(*) AS sold_count
                 FROM inventory_items
                 WHERE sold_at IS NOT NULL
                 GROUP BY product_name, product_brand, product_retail_price
                 ORDER BY sold_count DESC, product_name ASC, product_brand ASC,
                          product_retail_price ASC
                 LIMIT ?1",
            )?;
            let rows = stmt.query_map(params![limit], |row| {
                Ok(SoldRow {
                    product_name: row.get(0)?,
                    product_brand: row.get(1)?,
                    product_retail_price: row.get(2)?,
                    sold_count: row.get(3)?,
                })
            })?;
            let mut out = Vec::new();
            for row in rows {
                out.push(row?);
            }
            Ok(out)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Products whose name contains `term`, with total and available unit counts.
pub async fn search_products(
    db: &Database,
    term: &str,
    limit: i64,
) -> Result<Vec<ProductRow>, ClerkError> {
    let pattern = escape_like(&term.to_lowercase());
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT product_name, product_brand, product_category, product_retail_price,
                        COUNT(*) AS total_items,
                        SUM(CASE WHEN sold_at IS NULL THEN 1 ELSE 0 END) AS available_stock
                 FROM inventory_items
                 WHERE LOWER(product_name) LIKE '%' || ?1 || '%' ESCAPE '\\'
                 GROUP BY product_name, product_brand, product_category, product_retail_price
                 ORDER BY product_name ASC, product_brand ASC, product_retail_price ASC
                 LIMIT ?2",
            )?;
            let rows = stmt.query_map(params![pattern, limit], product_from_row)?;
            let mut out = Vec::new();
            for row in rows {
                out.push(row?);
            }
            Ok(out)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

fn product_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ProductRow> {
    Ok(ProductRow {
        product_name: row.get(0)?,
        product_brand: row.get(1)?,
        product_category: row.get(2)?,
        product_retail_price: row.get(3)?,
        total_items: row.get(4)?,
        available_stock: row.get(5)?,
    })
}

/// Products whose category contains `category`, with available unit counts.
pub async fn products_in_category(
    db: &Database,
    category: &str,
    limit: i64,
) -> Result<Vec<CategoryRow>, ClerkError> {
    let pattern = escape_like(&category.to_lowercase());
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT product_name, product_brand, product_retail_price,
                        SUM(CASE WHEN sold_at IS NULL THEN 1 ELSE 0 END) AS available_stock
                 FROM inventory_items
                 WHERE LOWER(product_category) LIKE '%' || ?1 || '%' ESCAPE '\\'
                 GROUP BY product_name, product_brand, product_retail_price
                 ORDER BY product_name ASC, product_brand ASC, product_retail_price ASC
                 LIMIT ?2",
            )?;
            let rows = stmt.query_map(params![pattern, limit], |row| {
                Ok(CategoryRow {
                    product_name: row.get(0)?,
                    product_brand: row.get(1)?,
                    product_retail_price: row.get(2)?,
                    available_stock: row.get(3)?,
                })
            })?;
            let mut out = Vec::new();
            for row in rows {
                out.push(row?);
            }
            Ok(out)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Distinct products across the whole catalog.
pub async fn list_products(db: &Database, limit: i64) -> Result<Vec<ProductRow>, ClerkError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT product_name, product_brand, product_category, product_retail_price,
                        COUNT(*) AS total_items,
                        SUM(CASE WHEN sold_at IS NULL THEN 1 ELSE 0 END) AS available_stock
                 FROM inventory_items
                 GROUP BY product_name, product_brand, product_category, product_retail_price
                 ORDER BY product_name ASC, product_brand ASC, product_retail_price ASC
                 LIMIT ?1",
            )?;
            let rows = stmt.query_map(params![limit], product_from_row)?;
            let mut out = Vec::new();
            for row in rows {
                out.push(row?);
            }
            Ok(out)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Most recent orders.
pub async fn list_orders(db: &Database, limit: i64) -> Result<Vec<OrderRecord>, ClerkError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ORDER_COLUMNS} FROM orders
                 ORDER BY created_at DESC, order_id ASC LIMIT ?1"
            ))?;
            let rows = stmt.query_map(params![limit], order_from_row)?;
            let mut out = Vec::new();
            for row in rows {
                out.push(row?);
            }
            Ok(out)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Connectivity check for health reporting.
pub async fn ping(db: &Database) -> Result<(), ClerkError> {
    db.connection()
        .call(|conn| {
            conn.query_row("SELECT 1", [], |_| Ok(()))?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Insert one inventory unit (import/seeding path).
pub async fn insert_inventory_unit(db: &Database, unit: &InventoryUnit) -> Result<(), ClerkError> {
    let unit = unit.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO inventory_items
                   (product_name, product_brand, product_category, product_retail_price, sold_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    unit.product_name,
                    unit.product_brand,
                    unit.product_category,
                    unit.product_retail_price,
                    unit.sold_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Insert one order record (import/seeding path).
pub async fn insert_order(db: &Database, order: &OrderRecord) -> Result<(), ClerkError> {
    let order = order.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO orders
                   (order_id, user_id, status, num_of_item, created_at, shipped_at, delivered_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    order.order_id,
                    order.user_id,
                    order.status,
                    order.num_of_item,
                    order.created_at,
                    order.shipped_at,
                    order.delivered_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    fn unit(name: &str, brand: &str, category: &str, price: f64, sold: bool) -> InventoryUnit {
        InventoryUnit {
            product_name: name.to_string(),
            product_brand: brand.to_string(),
            product_category: category.to_string(),
            product_retail_price: price,
            sold_at: sold.then(|| "2026-01-15T12:00:00.000Z".to_string()),
        }
    }

    async fn seed_units(db: &Database, units: &[InventoryUnit]) {
        for u in units {
            insert_inventory_unit(db, u).await.unwrap();
        }
    }

    #[tokio::test]
    async fn stock_counts_only_unsold_units() {
        let (db, _dir) = setup_db().await;
        seed_units(
            &db,
            &[
                unit("Classic T-Shirt", "Acme", "Tops", 19.99, false),
                unit("Classic T-Shirt", "Acme", "Tops", 19.99, false),
                unit("Classic T-Shirt", "Acme", "Tops", 19.99, true),
                unit("Denim Jacket", "Acme", "Outerwear", 59.99, false),
            ],
        )
        .await;

        let rows = stock_for_product(&db, "t-shirt").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].product_name, "Classic T-Shirt");
        assert_eq!(rows[0].stock_count, 2);
        assert_eq!(rows[0].product_retail_price, 19.99);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn stock_match_is_case_insensitive_substring() {
        let (db, _dir) = setup_db().await;
        seed_units(&db, &[unit("Classic T-Shirt", "Acme", "Tops", 19.99, false)]).await;

        assert_eq!(stock_for_product(&db, "SHIRT").await.unwrap().len(), 1);
        assert_eq!(stock_for_product(&db, "classic").await.unwrap().len(), 1);
        assert!(stock_for_product(&db, "jacket").await.unwrap().is_empty());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn stock_ignores_like_wildcards_in_input() {
        let (db, _dir) = setup_db().await;
        seed_units(&db, &[unit("Classic T-Shirt", "Acme", "Tops", 19.99, false)]).await;

        // A bare '%' must not match everything.
        assert!(stock_for_product(&db, "%").await.unwrap().is_empty());
        assert!(stock_for_product(&db, "_____").await.unwrap().is_empty());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn top_sold_orders_by_count_then_name_then_brand() {
        let (db, _dir) = setup_db().await;
        // Sold counts: Alpha 3, Beta 2, Gamma 2 (two brands), Delta 1.
        let mut units = Vec::new();
        for _ in 0..3 {
            units.push(unit("Alpha", "BrandA", "Tops", 10.0, true));
        }
        for _ in 0..2 {
            units.push(unit("Beta", "BrandB", "Tops", 12.0, true));
            units.push(unit("Gamma", "BrandZ", "Tops", 14.0, true));
        }
        units.push(unit("Delta", "BrandD", "Tops", 16.0, true));
        units.push(unit("Unsold", "BrandU", "Tops", 18.0, false));
        seed_units(&db, &units).await;

        let rows = top_sold_products(&db, 5).await.unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r.product_name.as_str()).collect();
        assert_eq!(names, ["Alpha", "Beta", "Gamma", "Delta"]);
        assert_eq!(rows[0].sold_count, 3);
        assert_eq!(rows[1].sold_count, 2);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn top_sold_limit_truncates_deterministically() {
        let (db, _dir) = setup_db().await;
        // Counts 10, 10, 8, 5, 3, 1, 1 across seven products.
        let counts = [
            ("Aardvark", 10),
            ("Zebra", 10),
            ("Heron", 8),
            ("Mole", 5),
            ("Newt", 3),
            ("Otter", 1),
            ("Pike", 1),
        ];
        let mut units = Vec::new();
        for (name, n) in counts {
            for _ in 0..n {
                units.push(unit(name, "Brand", "Misc", 9.99, true));
            }
        }
        seed_units(&db, &units).await;

        let rows = top_sold_products(&db, 5).await.unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r.product_name.as_str()).collect();
        // Ties broken by name ascending; Otter/Pike fall off the end.
        assert_eq!(names, ["Aardvark", "Zebra", "Heron", "Mole", "Newt"]);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn same_name_and_brand_at_two_prices_stay_separate_groups() {
        let (db, _dir) = setup_db().await;
        // Classic T-Shirt / Acme exists at two price points.
        seed_units(
            &db,
            &[
                unit("Classic T-Shirt", "Acme", "Tops", 19.99, true),
                unit("Classic T-Shirt", "Acme", "Tops", 19.99, true),
                unit("Classic T-Shirt", "Acme", "Tops", 19.99, false),
                unit("Classic T-Shirt", "Acme", "Tops", 29.99, true),
                unit("Classic T-Shirt", "Acme", "Tops", 29.99, false),
            ],
        )
        .await;

        let sold = top_sold_products(&db, 10).await.unwrap();
        assert_eq!(sold.len(), 2);
        assert_eq!(sold[0].product_retail_price, 19.99);
        assert_eq!(sold[0].sold_count, 2);
        assert_eq!(sold[1].product_retail_price, 29.99);
        assert_eq!(sold[1].sold_count, 1);

        let found = search_products(&db, "shirt", 20).await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].product_retail_price, 19.99);
        assert_eq!(found[0].total_items, 3);
        assert_eq!(found[1].product_retail_price, 29.99);
        assert_eq!(found[1].total_items, 2);

        let browsed = products_in_category(&db, "tops", 20).await.unwrap();
        assert_eq!(browsed.len(), 2);
        assert_eq!(browsed[0].available_stock, 1);
        assert_eq!(browsed[1].available_stock, 1);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn stock_check_counts_within_one_price_group() {
        let (db, _dir) = setup_db().await;
        seed_units(
            &db,
            &[
                unit("Classic T-Shirt", "Acme", "Tops", 19.99, false),
                unit("Classic T-Shirt", "Acme", "Tops", 29.99, false),
            ],
        )
        .await;

        // Units at different prices must not merge into one count of 2; the
        // equal-count tie breaks toward the lower price.
        let rows = stock_for_product(&db, "t-shirt").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].stock_count, 1);
        assert_eq!(rows[0].product_retail_price, 19.99);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn search_products_reports_total_and_available() {
        let (db, _dir) = setup_db().await;
        seed_units(
            &db,
            &[
                unit("Classic T-Shirt", "Acme", "Tops", 19.99, false),
                unit("Classic T-Shirt", "Acme", "Tops", 19.99, true),
                unit("Slim T-Shirt", "Bolt", "Tops", 24.99, false),
                unit("Denim Jacket", "Acme", "Outerwear", 59.99, false),
            ],
        )
        .await;

        let rows = search_products(&db, "shirt", 20).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].product_name, "Classic T-Shirt");
        assert_eq!(rows[0].total_items, 2);
        assert_eq!(rows[0].available_stock, 1);
        assert_eq!(rows[1].product_name, "Slim T-Shirt");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn category_browse_counts_available_per_product() {
        let (db, _dir) = setup_db().await;
        seed_units(
            &db,
            &[
                unit("Classic T-Shirt", "Acme", "Tops", 19.99, false),
                unit("Classic T-Shirt", "Acme", "Tops", 19.99, true),
                unit("Slim T-Shirt", "Bolt", "Tops", 24.99, false),
                unit("Denim Jacket", "Acme", "Outerwear", 59.99, false),
            ],
        )
        .await;

        let rows = products_in_category(&db, "tops", 20).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].product_name, "Classic T-Shirt");
        assert_eq!(rows[0].available_stock, 1);

        assert!(products_in_category(&db, "shoes", 20).await.unwrap().is_empty());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn order_lookup_and_listing() {
        let (db, _dir) = setup_db().await;
        let order = OrderRecord {
            order_id: "12345".to_string(),
            user_id: "u-1".to_string(),
            status: "Shipped".to_string(),
            num_of_item: 2,
            created_at: "2026-01-10T08:00:00.000Z".to_string(),
            shipped_at: Some("2026-01-11T08:00:00.000Z".to_string()),
            delivered_at: None,
        };
        insert_order(&db, &order).await.unwrap();
        let later = OrderRecord {
            order_id: "67890".to_string(),
            created_at: "2026-02-01T08:00:00.000Z".to_string(),
            ..order.clone()
        };
        insert_order(&db, &later).await.unwrap();

        assert_eq!(order_by_id(&db, "12345").await.unwrap().unwrap(), order);
        assert!(order_by_id(&db, "99999").await.unwrap().is_none());

        let listed = list_orders(&db, 10).await.unwrap();
        assert_eq!(listed[0].order_id, "67890");
        assert_eq!(listed[1].order_id, "12345");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn ping_succeeds_on_open_database() {
        let (db, _dir) = setup_db().await;
        ping(&db).await.unwrap();
        db.close().await.unwrap();
    }
}

use crate::rows::{CourierRow, OrderRow, StoragePlaceRow};
use delivery_domain::error::{DomainError, DomainResult};
use sqlx::PgConnection;
use uuid::Uuid;

const ORDER_COLUMNS: &str = "id, courier_id, location_x, location_y, volume, status";
const COURIER_COLUMNS: &str = "id, name, location_x, location_y, speed";
const PLACE_COLUMNS: &str = "id, courier_id, name, total_volume, order_id";

// ---- orders ----

pub(crate) async fn insert_order(conn: &mut PgConnection, row: &OrderRow) -> DomainResult<()> {
    let result = sqlx::query(
        r#"
        INSERT INTO orders (id, courier_id, location_x, location_y, volume, status)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (id) DO NOTHING
        "#,
    )
    .bind(row.id)
    .bind(row.courier_id)
    .bind(row.location_x)
    .bind(row.location_y)
    .bind(row.volume)
    .bind(row.status)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DomainError::AlreadyExists {
            entity: "order",
            id: row.id.to_string(),
        });
    }
    Ok(())
}

pub(crate) async fn update_order(conn: &mut PgConnection, row: &OrderRow) -> DomainResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE orders
        SET courier_id = $2, location_x = $3, location_y = $4, volume = $5, status = $6
        WHERE id = $1
        "#,
    )
    .bind(row.id)
    .bind(row.courier_id)
    .bind(row.location_x)
    .bind(row.location_y)
    .bind(row.volume)
    .bind(row.status)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DomainError::not_found("order", format!("id {}", row.id)));
    }
    Ok(())
}

pub(crate) async fn find_order(conn: &mut PgConnection, id: Uuid) -> DomainResult<OrderRow> {
    sqlx::query_as::<_, OrderRow>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| DomainError::not_found("order", format!("id {id}")))
}

pub(crate) async fn orders_with_status(
    conn: &mut PgConnection,
    status: i16,
) -> DomainResult<Vec<OrderRow>> {
    let rows = sqlx::query_as::<_, OrderRow>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE status = $1 ORDER BY seq"
    ))
    .bind(status)
    .fetch_all(&mut *conn)
    .await?;
    Ok(rows)
}

pub(crate) async fn first_order_with_status(
    conn: &mut PgConnection,
    status: i16,
) -> DomainResult<Option<OrderRow>> {
    let row = sqlx::query_as::<_, OrderRow>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE status = $1 ORDER BY seq LIMIT 1"
    ))
    .bind(status)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(row)
}

pub(crate) async fn orders_without_status(
    conn: &mut PgConnection,
    status: i16,
) -> DomainResult<Vec<OrderRow>> {
    let rows = sqlx::query_as::<_, OrderRow>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE status <> $1 ORDER BY seq"
    ))
    .bind(status)
    .fetch_all(&mut *conn)
    .await?;
    Ok(rows)
}

// ---- couriers ----

pub(crate) async fn insert_courier(
    conn: &mut PgConnection,
    row: &CourierRow,
    places: &[StoragePlaceRow],
) -> DomainResult<()> {
    let result = sqlx::query(
        r#"
        INSERT INTO couriers (id, name, location_x, location_y, speed)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (id) DO NOTHING
        "#,
    )
    .bind(row.id)
    .bind(&row.name)
    .bind(row.location_x)
    .bind(row.location_y)
    .bind(row.speed)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DomainError::AlreadyExists {
            entity: "courier",
            id: row.id.to_string(),
        });
    }
    upsert_places(conn, places).await
}

pub(crate) async fn update_courier(
    conn: &mut PgConnection,
    row: &CourierRow,
    places: &[StoragePlaceRow],
) -> DomainResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE couriers
        SET name = $2, location_x = $3, location_y = $4, speed = $5
        WHERE id = $1
        "#,
    )
    .bind(row.id)
    .bind(&row.name)
    .bind(row.location_x)
    .bind(row.location_y)
    .bind(row.speed)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DomainError::not_found("courier", format!("id {}", row.id)));
    }

    let keep: Vec<Uuid> = places.iter().map(|place| place.id).collect();
    sqlx::query("DELETE FROM storage_places WHERE courier_id = $1 AND NOT (id = ANY($2))")
        .bind(row.id)
        .bind(&keep)
        .execute(&mut *conn)
        .await?;

    upsert_places(conn, places).await
}

async fn upsert_places(conn: &mut PgConnection, places: &[StoragePlaceRow]) -> DomainResult<()> {
    for place in places {
        sqlx::query(
            r#"
            INSERT INTO storage_places (id, courier_id, name, total_volume, order_id)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE
            SET name = EXCLUDED.name,
                total_volume = EXCLUDED.total_volume,
                order_id = EXCLUDED.order_id
            "#,
        )
        .bind(place.id)
        .bind(place.courier_id)
        .bind(&place.name)
        .bind(place.total_volume)
        .bind(place.order_id)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

pub(crate) async fn find_courier(
    conn: &mut PgConnection,
    id: Uuid,
) -> DomainResult<(CourierRow, Vec<StoragePlaceRow>)> {
    let row = sqlx::query_as::<_, CourierRow>(&format!(
        "SELECT {COURIER_COLUMNS} FROM couriers WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| DomainError::not_found("courier", format!("id {id}")))?;

    let places = sqlx::query_as::<_, StoragePlaceRow>(&format!(
        "SELECT {PLACE_COLUMNS} FROM storage_places WHERE courier_id = $1 ORDER BY seq"
    ))
    .bind(id)
    .fetch_all(&mut *conn)
    .await?;

    Ok((row, places))
}

/// 按创建顺序列出骑手及其存储位；给出 `busy_status` 时排除持有该状态订单的骑手
pub(crate) async fn list_couriers(
    conn: &mut PgConnection,
    busy_status: Option<i16>,
) -> DomainResult<Vec<(CourierRow, Vec<StoragePlaceRow>)>> {
    let rows = match busy_status {
        Some(status) => {
            sqlx::query_as::<_, CourierRow>(&format!(
                r#"
                SELECT {COURIER_COLUMNS} FROM couriers c
                WHERE NOT EXISTS (
                    SELECT 1 FROM orders o WHERE o.courier_id = c.id AND o.status = $1
                )
                ORDER BY c.seq
                "#
            ))
            .bind(status)
            .fetch_all(&mut *conn)
            .await?
        }
        None => {
            sqlx::query_as::<_, CourierRow>(&format!(
                "SELECT {COURIER_COLUMNS} FROM couriers ORDER BY seq"
            ))
            .fetch_all(&mut *conn)
            .await?
        }
    };

    let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
    let places = sqlx::query_as::<_, StoragePlaceRow>(&format!(
        "SELECT {PLACE_COLUMNS} FROM storage_places WHERE courier_id = ANY($1) ORDER BY seq"
    ))
    .bind(&ids)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let own = places
                .iter()
                .filter(|place| place.courier_id == row.id)
                .cloned()
                .collect();
            (row, own)
        })
        .collect())
}

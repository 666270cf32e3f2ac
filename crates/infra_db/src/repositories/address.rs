//! Address repository implementation
//!
//! Addresses reference their owner through `person_adhaar_card_no`. The
//! column is not a foreign key, so deleting a person leaves the address
//! rows behind; existence of the owner is checked by the callers.

use sqlx::PgConnection;

use crate::error::DatabaseError;

const ADDRESS_COLUMNS: &str =
    "id, house_number, street_name, city, state, zip_code, person_adhaar_card_no";

/// Repository for address rows
#[derive(Debug, Clone, Copy, Default)]
pub struct AddressRepository;

impl AddressRepository {
    /// Retrieves every address owned by a person, ordered by id
    pub async fn find_by_owner(
        conn: &mut PgConnection,
        owner: &str,
    ) -> Result<Vec<AddressRow>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM address WHERE person_adhaar_card_no = $1 ORDER BY id",
            ADDRESS_COLUMNS
        );
        let rows = sqlx::query_as::<_, AddressRow>(&sql)
            .bind(owner)
            .fetch_all(&mut *conn)
            .await?;
        Ok(rows)
    }

    /// Retrieves the address matching both id and owner
    pub async fn find_for_owner(
        conn: &mut PgConnection,
        id: i64,
        owner: &str,
    ) -> Result<Option<AddressRow>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM address WHERE id = $1 AND person_adhaar_card_no = $2",
            ADDRESS_COLUMNS
        );
        let row = sqlx::query_as::<_, AddressRow>(&sql)
            .bind(id)
            .bind(owner)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(row)
    }

    /// Checks whether an address matching both id and owner exists
    pub async fn exists_for_owner(
        conn: &mut PgConnection,
        id: i64,
        owner: &str,
    ) -> Result<bool, DatabaseError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM address WHERE id = $1 AND person_adhaar_card_no = $2)",
        )
        .bind(id)
        .bind(owner)
        .fetch_one(&mut *conn)
        .await?;
        Ok(exists)
    }

    /// Inserts a new address, letting the database assign its id
    pub async fn insert(conn: &mut PgConnection, address: &NewAddress) -> Result<AddressRow, DatabaseError> {
        let sql = format!(
            r#"
            INSERT INTO address (house_number, street_name, city, state, zip_code, person_adhaar_card_no)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            ADDRESS_COLUMNS
        );
        let row = sqlx::query_as::<_, AddressRow>(&sql)
            .bind(&address.house_number)
            .bind(&address.street_name)
            .bind(&address.city)
            .bind(&address.state)
            .bind(&address.zip_code)
            .bind(&address.owner)
            .fetch_one(&mut *conn)
            .await?;
        Ok(row)
    }

    /// Writes an address under a known id, overwriting any existing row
    pub async fn upsert(
        conn: &mut PgConnection,
        id: i64,
        address: &NewAddress,
    ) -> Result<AddressRow, DatabaseError> {
        let sql = format!(
            r#"
            INSERT INTO address (id, house_number, street_name, city, state, zip_code, person_adhaar_card_no)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE SET
                house_number = EXCLUDED.house_number,
                street_name = EXCLUDED.street_name,
                city = EXCLUDED.city,
                state = EXCLUDED.state,
                zip_code = EXCLUDED.zip_code,
                person_adhaar_card_no = EXCLUDED.person_adhaar_card_no
            RETURNING {}
            "#,
            ADDRESS_COLUMNS
        );
        let row = sqlx::query_as::<_, AddressRow>(&sql)
            .bind(id)
            .bind(&address.house_number)
            .bind(&address.street_name)
            .bind(&address.city)
            .bind(&address.state)
            .bind(&address.zip_code)
            .bind(&address.owner)
            .fetch_one(&mut *conn)
            .await?;
        Ok(row)
    }

    /// Deletes the address matching both id and owner in a single statement
    ///
    /// # Returns
    ///
    /// True if a row was removed
    pub async fn delete_for_owner(
        conn: &mut PgConnection,
        id: i64,
        owner: &str,
    ) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM address WHERE id = $1 AND person_adhaar_card_no = $2")
            .bind(id)
            .bind(owner)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Row types
// ============================================================================

/// Database row for an address
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AddressRow {
    pub id: i64,
    pub house_number: String,
    pub street_name: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub person_adhaar_card_no: String,
}

/// Address columns for insert and update
#[derive(Debug, Clone)]
pub struct NewAddress {
    pub house_number: String,
    pub street_name: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub owner: String,
}

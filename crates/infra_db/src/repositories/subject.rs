//! Subject repository implementation
//!
//! This module provides database access for patients and doctors. Both
//! roles share a row in `person` and extend it with a row in `patient` or
//! `doctor` under the same identity number. Reads join all three tables
//! and report which extension was present.
//!
//! Every method takes the connection to run on, so callers decide whether
//! the statements join an open transaction.

use chrono::NaiveDate;
use sqlx::{Connection, PgConnection};

use crate::error::DatabaseError;

const SELECT_SUBJECT: &str = r#"
    SELECT
        p.adhaar_card_no,
        p.first_name,
        p.last_name,
        p.gender,
        p.date_of_birth,
        p.contact_number,
        p.email,
        pt.adhaar_card_no IS NOT NULL AS is_patient,
        pt.ailment,
        pt.occupation,
        d.adhaar_card_no IS NOT NULL AS is_doctor,
        d.license_number,
        d.specialization,
        d.qualification
    FROM person p
    LEFT JOIN patient pt ON pt.adhaar_card_no = p.adhaar_card_no
    LEFT JOIN doctor d ON d.adhaar_card_no = p.adhaar_card_no
"#;

/// Which role extension a query should be restricted to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectTable {
    Patient,
    Doctor,
}

impl SubjectTable {
    fn filter(&self) -> &'static str {
        match self {
            SubjectTable::Patient => "pt.adhaar_card_no IS NOT NULL",
            SubjectTable::Doctor => "d.adhaar_card_no IS NOT NULL",
        }
    }
}

/// Repository for subject rows
///
/// Stateless; all queries run on the connection passed in.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubjectRepository;

impl SubjectRepository {
    /// Retrieves a subject by identity number
    ///
    /// # Arguments
    ///
    /// * `conn` - The connection or transaction to query on
    /// * `adhaar_card_no` - The identity number
    ///
    /// # Returns
    ///
    /// The joined subject row, or `None`
    pub async fn find_by_id(
        conn: &mut PgConnection,
        adhaar_card_no: &str,
    ) -> Result<Option<SubjectRow>, DatabaseError> {
        let sql = format!("{} WHERE p.adhaar_card_no = $1", SELECT_SUBJECT);
        let row = sqlx::query_as::<_, SubjectRow>(&sql)
            .bind(adhaar_card_no)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(row)
    }

    /// Retrieves every subject in one role, ordered by identity number
    pub async fn find_all(
        conn: &mut PgConnection,
        table: SubjectTable,
    ) -> Result<Vec<SubjectRow>, DatabaseError> {
        let sql = format!(
            "{} WHERE {} ORDER BY p.adhaar_card_no",
            SELECT_SUBJECT,
            table.filter()
        );
        let rows = sqlx::query_as::<_, SubjectRow>(&sql)
            .fetch_all(&mut *conn)
            .await?;
        Ok(rows)
    }

    /// Retrieves the subject in one role holding `email`
    pub async fn find_by_email(
        conn: &mut PgConnection,
        table: SubjectTable,
        email: &str,
    ) -> Result<Option<SubjectRow>, DatabaseError> {
        let sql = format!("{} WHERE {} AND p.email = $1", SELECT_SUBJECT, table.filter());
        let row = sqlx::query_as::<_, SubjectRow>(&sql)
            .bind(email)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(row)
    }

    /// Retrieves every subject in one role with exactly this contact number
    pub async fn find_by_contact_number(
        conn: &mut PgConnection,
        table: SubjectTable,
        contact_number: i64,
    ) -> Result<Vec<SubjectRow>, DatabaseError> {
        let sql = format!(
            "{} WHERE {} AND p.contact_number = $1 ORDER BY p.adhaar_card_no",
            SELECT_SUBJECT,
            table.filter()
        );
        let rows = sqlx::query_as::<_, SubjectRow>(&sql)
            .bind(contact_number)
            .fetch_all(&mut *conn)
            .await?;
        Ok(rows)
    }

    /// Checks whether a person row exists
    pub async fn exists(conn: &mut PgConnection, adhaar_card_no: &str) -> Result<bool, DatabaseError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM person WHERE adhaar_card_no = $1)",
        )
        .bind(adhaar_card_no)
        .fetch_one(&mut *conn)
        .await?;
        Ok(exists)
    }

    /// Inserts a new subject
    ///
    /// The person row and its role extension are written atomically; when
    /// `conn` is already inside a transaction this becomes a savepoint.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::DuplicateEntry` if the identity number,
    /// email or license number is taken
    pub async fn insert(conn: &mut PgConnection, subject: &NewSubject) -> Result<(), DatabaseError> {
        let mut tx = conn.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO person (
                adhaar_card_no, first_name, last_name, gender,
                date_of_birth, contact_number, email
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&subject.person.adhaar_card_no)
        .bind(&subject.person.first_name)
        .bind(&subject.person.last_name)
        .bind(&subject.person.gender)
        .bind(subject.person.date_of_birth)
        .bind(subject.person.contact_number)
        .bind(&subject.person.email)
        .execute(&mut *tx)
        .await?;

        Self::write_role(&mut *tx, &subject.person.adhaar_card_no, &subject.role).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Overwrites an existing subject's person row and role extension
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if no person row matched
    pub async fn update(conn: &mut PgConnection, subject: &NewSubject) -> Result<(), DatabaseError> {
        let mut tx = conn.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE person
            SET first_name = $2,
                last_name = $3,
                gender = $4,
                date_of_birth = $5,
                contact_number = $6,
                email = $7,
                updated_at = now()
            WHERE adhaar_card_no = $1
            "#,
        )
        .bind(&subject.person.adhaar_card_no)
        .bind(&subject.person.first_name)
        .bind(&subject.person.last_name)
        .bind(&subject.person.gender)
        .bind(subject.person.date_of_birth)
        .bind(subject.person.contact_number)
        .bind(&subject.person.email)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Person", &subject.person.adhaar_card_no));
        }

        Self::write_role(&mut *tx, &subject.person.adhaar_card_no, &subject.role).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn write_role(
        conn: &mut PgConnection,
        adhaar_card_no: &str,
        role: &NewRole,
    ) -> Result<(), DatabaseError> {
        match role {
            NewRole::Patient { ailment, occupation } => {
                sqlx::query(
                    r#"
                    INSERT INTO patient (adhaar_card_no, ailment, occupation)
                    VALUES ($1, $2, $3)
                    ON CONFLICT (adhaar_card_no)
                    DO UPDATE SET ailment = EXCLUDED.ailment, occupation = EXCLUDED.occupation
                    "#,
                )
                .bind(adhaar_card_no)
                .bind(ailment)
                .bind(occupation)
                .execute(&mut *conn)
                .await?;
            }
            NewRole::Doctor {
                license_number,
                specialization,
                qualification,
            } => {
                sqlx::query(
                    r#"
                    INSERT INTO doctor (adhaar_card_no, license_number, specialization, qualification)
                    VALUES ($1, $2, $3, $4)
                    ON CONFLICT (adhaar_card_no)
                    DO UPDATE SET license_number = EXCLUDED.license_number,
                                  specialization = EXCLUDED.specialization,
                                  qualification = EXCLUDED.qualification
                    "#,
                )
                .bind(adhaar_card_no)
                .bind(license_number)
                .bind(specialization)
                .bind(qualification)
                .execute(&mut *conn)
                .await?;
            }
        }
        Ok(())
    }

    /// Deletes a subject and its role extension
    ///
    /// Addresses referencing the subject are not touched.
    ///
    /// # Returns
    ///
    /// True if a person row was removed
    pub async fn delete(conn: &mut PgConnection, adhaar_card_no: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM person WHERE adhaar_card_no = $1")
            .bind(adhaar_card_no)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Row types
// ============================================================================

/// Joined row of `person` with its optional role extensions
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SubjectRow {
    pub adhaar_card_no: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub date_of_birth: NaiveDate,
    pub contact_number: i64,
    pub email: Option<String>,
    pub is_patient: bool,
    pub ailment: Option<String>,
    pub occupation: Option<String>,
    pub is_doctor: bool,
    pub license_number: Option<String>,
    pub specialization: Option<String>,
    pub qualification: Option<String>,
}

/// Person columns for insert and update
#[derive(Debug, Clone)]
pub struct NewPerson {
    pub adhaar_card_no: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub date_of_birth: NaiveDate,
    pub contact_number: i64,
    pub email: Option<String>,
}

/// Role extension columns for insert and update
#[derive(Debug, Clone)]
pub enum NewRole {
    Patient {
        ailment: String,
        occupation: Option<String>,
    },
    Doctor {
        license_number: String,
        specialization: String,
        qualification: String,
    },
}

/// A complete subject ready to be written
#[derive(Debug, Clone)]
pub struct NewSubject {
    pub person: NewPerson,
    pub role: NewRole,
}

use async_trait::async_trait;
use sqlx::PgPool;

use super::{CrudRepository, Page};
use crate::database::errors::{DbError, DbResult};
use crate::database::models::{Employee, EmployeeInput};

const EMPLOYEE_COLUMNS: &str = "employee_id, last_name, first_name, title, title_of_courtesy, \
     birth_date, hire_date, address, city, region, postal_code, country, home_phone, \
     extension, notes, reports_to, photo_path";

pub struct PgEmployeeRepository {
    pool: PgPool,
}

impl PgEmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CrudRepository for PgEmployeeRepository {
    type Entity = Employee;
    type Detail = Employee;
    type Input = EmployeeInput;

    async fn list(&self, page: Page) -> DbResult<(Vec<Employee>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employees")
            .fetch_one(&self.pool)
            .await?;

        let employees = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees ORDER BY employee_id LIMIT $1 OFFSET $2"
        ))
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((employees, total))
    }

    async fn get(&self, id: i32) -> DbResult<Employee> {
        sqlx::query_as::<_, Employee>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE employee_id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::NotFound)
    }

    async fn create(&self, input: &EmployeeInput) -> DbResult<Employee> {
        let employee = sqlx::query_as::<_, Employee>(&format!(
            r#"
            INSERT INTO employees (
                last_name, first_name, title, title_of_courtesy, birth_date, hire_date,
                address, city, region, postal_code, country, home_phone, extension,
                notes, reports_to, photo_path
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING {EMPLOYEE_COLUMNS}
            "#
        ))
        .bind(&input.last_name)
        .bind(&input.first_name)
        .bind(&input.title)
        .bind(&input.title_of_courtesy)
        .bind(input.birth_date)
        .bind(input.hire_date)
        .bind(&input.address)
        .bind(&input.city)
        .bind(&input.region)
        .bind(&input.postal_code)
        .bind(&input.country)
        .bind(&input.home_phone)
        .bind(&input.extension)
        .bind(&input.notes)
        .bind(input.reports_to)
        .bind(&input.photo_path)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("Created employee {}", employee.employee_id);
        Ok(employee)
    }

    async fn update(&self, id: i32, input: &EmployeeInput) -> DbResult<Employee> {
        sqlx::query_as::<_, Employee>(&format!(
            r#"
            UPDATE employees
            SET last_name = $1, first_name = $2, title = $3, title_of_courtesy = $4,
                birth_date = $5, hire_date = $6, address = $7, city = $8, region = $9,
                postal_code = $10, country = $11, home_phone = $12, extension = $13,
                notes = $14, reports_to = $15, photo_path = $16
            WHERE employee_id = $17
            RETURNING {EMPLOYEE_COLUMNS}
            "#
        ))
        .bind(&input.last_name)
        .bind(&input.first_name)
        .bind(&input.title)
        .bind(&input.title_of_courtesy)
        .bind(input.birth_date)
        .bind(input.hire_date)
        .bind(&input.address)
        .bind(&input.city)
        .bind(&input.region)
        .bind(&input.postal_code)
        .bind(&input.country)
        .bind(&input.home_phone)
        .bind(&input.extension)
        .bind(&input.notes)
        .bind(input.reports_to)
        .bind(&input.photo_path)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::NotFound)
    }

    async fn delete(&self, id: i32) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM employees WHERE employee_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }
}

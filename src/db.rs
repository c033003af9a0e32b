use sqlx::MySqlPool;

pub async fn init_db(database_url: &str) -> MySqlPool {
    MySqlPool::connect(database_url)
        .await
        .expect("Failed to connect to database")
}

/// Bring up the schema on a fresh database. Every statement is idempotent.
///
/// The unique key on time_entries (employee_id, date) is load-bearing: two
/// concurrent check-ins for the same day race past any application-level
/// existence check, so the store enforces one entry per employee per day.
pub async fn ensure_schema(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    const STATEMENTS: &[&str] = &[
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
            email VARCHAR(255) NOT NULL UNIQUE,
            password VARCHAR(255) NOT NULL,
            name VARCHAR(255) NOT NULL,
            role ENUM('admin', 'hr', 'manager', 'employee') NOT NULL,
            last_login_at TIMESTAMP NULL,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS employees (
            id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
            employee_code VARCHAR(50) NOT NULL UNIQUE,
            user_id BIGINT UNSIGNED NULL,
            name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL UNIQUE,
            phone VARCHAR(20),
            department VARCHAR(255),
            position VARCHAR(255),
            manager_id BIGINT UNSIGNED NULL,
            join_date DATE,
            salary DOUBLE,
            skills TEXT,
            kpi DOUBLE,
            status ENUM('active', 'inactive', 'probation', 'terminated') NOT NULL DEFAULT 'active',
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS time_entries (
            id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
            employee_id BIGINT UNSIGNED NOT NULL,
            date DATE NOT NULL,
            check_in TIME NOT NULL,
            check_out TIME NULL,
            location VARCHAR(255),
            type VARCHAR(50) NOT NULL DEFAULT 'office',
            status ENUM('on_time', 'late', 'early_leave') NOT NULL,
            overtime DOUBLE NOT NULL DEFAULT 0,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            UNIQUE KEY uq_time_entries_employee_date (employee_id, date)
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS leave_requests (
            id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
            employee_id BIGINT UNSIGNED NOT NULL,
            type ENUM('annual', 'sick', 'unpaid', 'maternity', 'emergency') NOT NULL,
            start_date DATE NOT NULL,
            end_date DATE NOT NULL,
            days BIGINT NOT NULL,
            reason TEXT,
            status ENUM('pending', 'approved', 'rejected') NOT NULL DEFAULT 'pending',
            approved_by BIGINT UNSIGNED NULL,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS tasks (
            id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
            title VARCHAR(255) NOT NULL,
            description TEXT,
            assigned_to BIGINT UNSIGNED NOT NULL,
            assigned_by BIGINT UNSIGNED NOT NULL,
            department VARCHAR(255),
            priority ENUM('low', 'medium', 'high', 'urgent') NOT NULL DEFAULT 'medium',
            status ENUM('not_started', 'in_progress', 'completed', 'overdue') NOT NULL DEFAULT 'not_started',
            progress TINYINT UNSIGNED NOT NULL DEFAULT 0,
            due_date DATE NULL,
            completed_date DATE NULL,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS task_comments (
            id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
            task_id BIGINT UNSIGNED NOT NULL,
            user_id BIGINT UNSIGNED NOT NULL,
            comment TEXT NOT NULL,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS assets (
            id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            type VARCHAR(100),
            model VARCHAR(255),
            serial_number VARCHAR(255) NOT NULL UNIQUE,
            purchase_date DATE,
            warranty_date DATE NULL,
            value DOUBLE,
            condition_status VARCHAR(100),
            status ENUM('available', 'assigned', 'maintenance', 'retired') NOT NULL DEFAULT 'available',
            assigned_to BIGINT UNSIGNED NULL,
            assigned_date DATE NULL,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS work_reports (
            id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
            employee_id BIGINT UNSIGNED NOT NULL,
            task_id BIGINT UNSIGNED NULL,
            title VARCHAR(255) NOT NULL,
            description TEXT,
            type VARCHAR(100),
            date DATE NOT NULL,
            hours_spent DOUBLE NOT NULL DEFAULT 0,
            status ENUM('draft', 'submitted', 'approved', 'rejected') NOT NULL DEFAULT 'draft',
            approved_by BIGINT UNSIGNED NULL,
            feedback TEXT,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS refresh_tokens (
            id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
            user_id BIGINT UNSIGNED NOT NULL,
            jti VARCHAR(64) NOT NULL UNIQUE,
            expires_at DATETIME NOT NULL,
            revoked BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    ];

    for statement in STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }

    Ok(())
}

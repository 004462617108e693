use rusqlite::Connection;
use tracing::info;

use crate::error::Result;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 =
        conn.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS caregivers (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                first_name      TEXT NOT NULL,
                last_name       TEXT NOT NULL,
                caregiver_type  TEXT NOT NULL,
                gender          TEXT,
                photo_url       TEXT,
                email           TEXT NOT NULL UNIQUE,
                phone           TEXT NOT NULL,
                city            TEXT NOT NULL,
                hourly_rate     REAL NOT NULL CHECK (hourly_rate > 0),
                bio             TEXT,
                password_hash   TEXT NOT NULL,
                created_at      DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at      DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE TABLE IF NOT EXISTS family_members (
                id                   INTEGER PRIMARY KEY AUTOINCREMENT,
                first_name           TEXT NOT NULL,
                last_name            TEXT NOT NULL,
                email                TEXT NOT NULL UNIQUE,
                phone                TEXT NOT NULL,
                password_hash        TEXT NOT NULL,
                city                 TEXT NOT NULL,
                address              TEXT,
                care_recipient_info  TEXT,
                house_rules          TEXT,
                created_at           DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at           DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE TABLE IF NOT EXISTS job_posts (
                id                    INTEGER PRIMARY KEY AUTOINCREMENT,
                family_id             INTEGER NOT NULL,
                title                 TEXT NOT NULL,
                caregiver_type        TEXT NOT NULL,
                city                  TEXT NOT NULL,
                care_recipient_age    INTEGER CHECK (care_recipient_age IS NULL OR care_recipient_age >= 0),
                description           TEXT,
                preferred_time_slots  TEXT,
                frequency             TEXT,
                requirements          TEXT,
                created_at            DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at            DATETIME DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (family_id) REFERENCES family_members(id)
                    ON DELETE CASCADE
                    ON UPDATE CASCADE
            );

            CREATE TABLE IF NOT EXISTS messages (
                id                     INTEGER PRIMARY KEY AUTOINCREMENT,
                sender_family_id       INTEGER,
                sender_caregiver_id    INTEGER,
                receiver_family_id     INTEGER,
                receiver_caregiver_id  INTEGER,
                content                TEXT NOT NULL,
                created_at             DATETIME DEFAULT CURRENT_TIMESTAMP,
                CHECK (sender_family_id IS NULL OR sender_caregiver_id IS NULL),
                CHECK (receiver_family_id IS NULL OR receiver_caregiver_id IS NULL),
                FOREIGN KEY (sender_family_id) REFERENCES family_members(id)
                    ON DELETE SET NULL
                    ON UPDATE CASCADE,
                FOREIGN KEY (sender_caregiver_id) REFERENCES caregivers(id)
                    ON DELETE SET NULL
                    ON UPDATE CASCADE,
                FOREIGN KEY (receiver_family_id) REFERENCES family_members(id)
                    ON DELETE SET NULL
                    ON UPDATE CASCADE,
                FOREIGN KEY (receiver_caregiver_id) REFERENCES caregivers(id)
                    ON DELETE SET NULL
                    ON UPDATE CASCADE
            );

            CREATE TABLE IF NOT EXISTS appointments (
                id                INTEGER PRIMARY KEY AUTOINCREMENT,
                caregiver_id      INTEGER NOT NULL,
                family_id         INTEGER NOT NULL,
                appointment_date  DATE NOT NULL,
                start_time        TIME NOT NULL,
                duration_hours    REAL NOT NULL CHECK (duration_hours > 0),
                status            TEXT NOT NULL DEFAULT 'pending',
                notes             TEXT,
                created_at        DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at        DATETIME DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (caregiver_id) REFERENCES caregivers(id)
                    ON DELETE CASCADE
                    ON UPDATE CASCADE,
                FOREIGN KEY (family_id) REFERENCES family_members(id)
                    ON DELETE CASCADE
                    ON UPDATE CASCADE
            );

            CREATE TABLE IF NOT EXISTS job_applications (
                id             INTEGER PRIMARY KEY AUTOINCREMENT,
                job_post_id    INTEGER NOT NULL,
                caregiver_id   INTEGER NOT NULL,
                cover_message  TEXT,
                status         TEXT NOT NULL DEFAULT 'applied',
                created_at     DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at     DATETIME DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (job_post_id) REFERENCES job_posts(id)
                    ON DELETE CASCADE
                    ON UPDATE CASCADE,
                FOREIGN KEY (caregiver_id) REFERENCES caregivers(id)
                    ON DELETE CASCADE
                    ON UPDATE CASCADE
            );

            -- One application per caregiver per post
            CREATE UNIQUE INDEX IF NOT EXISTS idx_job_applications_post_caregiver
                ON job_applications(job_post_id, caregiver_id);

            CREATE INDEX IF NOT EXISTS idx_job_posts_family
                ON job_posts(family_id);
            CREATE INDEX IF NOT EXISTS idx_job_applications_caregiver
                ON job_applications(caregiver_id);
            CREATE INDEX IF NOT EXISTS idx_appointments_caregiver
                ON appointments(caregiver_id, status);
            CREATE INDEX IF NOT EXISTS idx_appointments_family
                ON appointments(family_id);

            CREATE VIEW IF NOT EXISTS vw_job_applications AS
            SELECT
                ja.id AS application_id,
                jp.id AS job_post_id,
                jp.title AS job_title,
                fm.first_name || ' ' || fm.last_name AS family_member_name,
                c.first_name || ' ' || c.last_name AS caregiver_name,
                ja.status,
                ja.created_at
            FROM job_applications AS ja
            INNER JOIN job_posts AS jp ON jp.id = ja.job_post_id
            INNER JOIN family_members AS fm ON fm.id = jp.family_id
            INNER JOIN caregivers AS c ON c.id = ja.caregiver_id;

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}

//! Demo dataset: four caregivers, four families, four job posts, six
//! applications, five appointments and two messages, all in Astana.
//!
//! Password hashes are placeholders; these accounts cannot log in.

use tracing::info;

use crate::Database;
use crate::error::Result;

const FIXTURES: &str = "
    INSERT INTO caregivers (
        id, first_name, last_name, caregiver_type, gender, photo_url,
        email, phone, city, hourly_rate, bio, password_hash
    ) VALUES
        (1, 'Arman', 'Armanov', 'Babysitter', 'Male', NULL,
         'arman@example.com', '+77771234567', 'Astana', 9.5,
         'Certified babysitter with early childhood CPR training', 'hashed_pw_arman'),
        (2, 'Dana', 'Zhan', 'Elderly Care', 'Female', NULL,
         'dana@example.com', '+77772345678', 'Astana', 12.0,
         'Experienced nurse specialized in elder care', 'hashed_pw_dana'),
        (3, 'Timur', 'Bekov', 'Babysitter', 'Male', NULL,
         'timur@example.com', '+77773456789', 'Astana', 11.0,
         'STEM tutor and bilingual babysitter', 'hashed_pw_timur'),
        (4, 'Madina', 'Sadyk', 'Special Needs', 'Female', NULL,
         'madina@example.com', '+77774567890', 'Astana', 16.0,
         'Special education assistant with ten years of experience', 'hashed_pw_madina');

    INSERT INTO family_members (
        id, first_name, last_name, email, phone, password_hash, city,
        address, care_recipient_info, house_rules
    ) VALUES
        (1, 'Amina', 'Aminova', 'amina@example.com', '+77770000001', 'hashed_pw_amina', 'Astana',
         '45 Kabanbay Batyr Street', 'Daughter, 4 years old', 'No pets, quiet after 21:00'),
        (2, 'Bolat', 'Bolatov', 'bolat@example.com', '+77770000002', 'hashed_pw_bolat', 'Astana',
         '12 Dostyk Avenue', 'Father, 72 years old', 'No pets.'),
        (3, 'Kamila', 'Sultanova', 'kamila@example.com', '+77770000003', 'hashed_pw_kamila', 'Astana',
         '78 Turan Avenue', 'Son, 3 years old', 'No smoking indoors'),
        (4, 'Yerbol', 'Nurtay', 'yerbol@example.com', '+77770000004', 'hashed_pw_yerbol', 'Astana',
         '23 Mangilik El Avenue', 'Mother, 80 years old', 'Quiet hours after 22:00');

    INSERT INTO job_posts (
        id, family_id, title, caregiver_type, city, care_recipient_age,
        description, preferred_time_slots, frequency, requirements
    ) VALUES
        (1, 1, 'Evening Babysitter', 'Babysitter', 'Astana', 4,
         'Need help with evening routine for preschooler',
         '[\"Weekdays 18:00-21:00\"]', 'Weekdays', 'Energetic, soft-spoken, patient'),
        (2, 2, 'Companion for Elderly Parent', 'Elderly Care', 'Astana', 72,
         'Provide companionship and light exercise support',
         '[\"Daily 09:00-12:00\"]', 'Daily', 'Must be soft-spoken and punctual'),
        (3, 3, 'Weekend Babysitter', 'Babysitter', 'Astana', 3,
         'Focus on creative play and meal prep for toddler',
         '[\"Weekends 10:00-16:00\"]', 'Weekends', 'Comfortable with toddlers; creative play'),
        (4, 4, 'Overnight Elderly Care', 'Elderly Care', 'Astana', 80,
         'Overnight supervision and medication reminders',
         '[\"Weekdays 22:00-06:00\"]', 'Weeknights', 'Experienced with medication schedules');

    INSERT INTO job_applications (id, job_post_id, caregiver_id, cover_message, status) VALUES
        (1, 2, 2, 'I have eight years supporting elders with dementia.', 'accepted'),
        (2, 3, 1, 'Weekend availability and Montessori training.', 'accepted'),
        (3, 3, 3, 'STEM tutor offering creative activities.', 'applied'),
        (4, 4, 2, 'Comfortable with overnight schedules and medication.', 'applied'),
        (5, 2, 1, 'Bilingual support and light cooking.', 'applied'),
        (6, 3, 4, 'Experienced in special needs childcare.', 'applied');

    INSERT INTO appointments (
        id, caregiver_id, family_id, appointment_date, start_time, duration_hours, status, notes
    ) VALUES
        (1, 2, 2, '2025-11-01', '09:00:00', 4.0, 'accepted', 'Morning companionship session'),
        (2, 1, 3, '2025-11-02', '10:00:00', 5.0, 'accepted', 'Weekend creative activities'),
        (3, 3, 3, '2025-11-03', '12:00:00', 3.0, 'accepted', 'Afternoon tutoring and play'),
        (4, 2, 4, '2025-11-05', '22:00:00', 8.0, 'accepted', 'Overnight supervision and medication'),
        (5, 4, 4, '2025-11-06', '22:00:00', 6.0, 'pending', 'Trial overnight shift');

    INSERT INTO messages (
        id, sender_family_id, sender_caregiver_id, receiver_family_id, receiver_caregiver_id, content
    ) VALUES
        (1, 2, NULL, NULL, 2, 'We appreciate your support with our father.'),
        (2, NULL, 1, 3, NULL, 'Looking forward to the weekend appointment.');
";

impl Database {
    /// Loads the demo dataset in one transaction. Fails without writing
    /// anything if any of the fixture ids are already taken.
    pub fn load_fixtures(&self) -> Result<()> {
        self.with_tx(|tx| Ok(tx.execute_batch(FIXTURES)?))?;
        info!("Loaded fixture dataset");
        Ok(())
    }

    /// True when no caregivers or families exist yet.
    pub fn is_empty(&self) -> Result<bool> {
        self.with_conn(|conn| {
            let rows: i64 = conn.query_row(
                "SELECT (SELECT COUNT(*) FROM caregivers) + (SELECT COUNT(*) FROM family_members)",
                [],
                |r| r.get(0),
            )?;
            Ok(rows == 0)
        })
    }
}

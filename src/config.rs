use crate::domain::attendance::AttendancePolicy;
use crate::domain::leave::LeaveEntitlements;
use chrono::NaiveTime;
use dotenvy::dotenv;
use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub access_token_ttl: usize,
    pub refresh_token_ttl: usize,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_register_per_min: u32,
    pub rate_refresh_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,

    // Attendance thresholds
    pub work_start: NaiveTime,
    pub work_end: NaiveTime,

    // Yearly leave entitlements
    pub annual_leave_days: i64,
    pub sick_leave_days: i64,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            access_token_ttl: env_or("ACCESS_TOKEN_TTL", "900") // default 15 min
                .parse()
                .unwrap(),
            refresh_token_ttl: env_or("REFRESH_TOKEN_TTL", "604800") // default 7 days
                .parse()
                .unwrap(),

            rate_login_per_min: env_or("RATE_LOGIN_PER_MIN", "60").parse().unwrap(),
            rate_register_per_min: env_or("RATE_REGISTER_PER_MIN", "30").parse().unwrap(),
            rate_refresh_per_min: env_or("RATE_REFRESH_PER_MIN", "30").parse().unwrap(),
            rate_protected_per_min: env_or("RATE_PROTECTED_PER_MIN", "1000").parse().unwrap(),

            api_prefix: env_or("API_PREFIX", "/api/v1"),

            work_start: env_or("WORK_START", "09:00:00")
                .parse()
                .expect("WORK_START must be HH:MM:SS"),
            work_end: env_or("WORK_END", "18:00:00")
                .parse()
                .expect("WORK_END must be HH:MM:SS"),

            annual_leave_days: env_or("ANNUAL_LEAVE_DAYS", "15").parse().unwrap(),
            sick_leave_days: env_or("SICK_LEAVE_DAYS", "10").parse().unwrap(),
        }
    }

    pub fn attendance_policy(&self) -> AttendancePolicy {
        AttendancePolicy {
            work_start: self.work_start,
            work_end: self.work_end,
        }
    }

    pub fn leave_entitlements(&self) -> LeaveEntitlements {
        LeaveEntitlements {
            annual: self.annual_leave_days,
            sick: self.sick_leave_days,
        }
    }
}

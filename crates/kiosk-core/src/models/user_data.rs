use serde::{Deserialize, Serialize};

/// The evolving record for one kiosk session.
///
/// Created empty when the wizard mounts and only ever mutated through
/// [`UserData::merge`]; screens never hold their own copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserData {
    /// Server-issued client identifier. Empty until personal info is saved.
    pub id: String,
    pub age: u32,
    pub gender: Option<Gender>,
    /// Comma-separated complaint list as sent to the backend.
    pub complaint: String,
    pub personal_info: PersonalInfo,
    pub vitals: Vitals,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub nationality_id: Option<u32>,
    pub consent: bool,
    pub agree: bool,
}

impl PersonalInfo {
    /// Backend username: the full name with spaces removed, lowercased.
    pub fn username(&self) -> String {
        self.full_name.replace(' ', "").to_lowercase()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    pub heart_rate: f64,
    /// Formatted as `"{systolic}/{diastolic}"`.
    pub blood_pressure: String,
    pub breathing_rate: f64,
    pub hrv_sdnn_ms: f64,
    pub systolic_bp: f64,
    pub diastolic_bp: f64,
    pub oxygen_saturation: f64,
    pub temperature: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Parse a gender as typed or selected on the kiosk. Arabic labels map to
    /// the English API values.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "Male" | "male" | "ذكر" => Some(Self::Male),
            "Female" | "female" | "أنثى" => Some(Self::Female),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

/// Partial update for [`UserData`]. `None` leaves the existing value alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserDataPatch {
    pub id: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub complaint: Option<String>,
    pub personal_info: Option<PersonalInfoPatch>,
    pub vitals: Option<VitalsPatch>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonalInfoPatch {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub nationality_id: Option<u32>,
    pub consent: Option<bool>,
    pub agree: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VitalsPatch {
    pub heart_rate: Option<f64>,
    pub blood_pressure: Option<String>,
    pub breathing_rate: Option<f64>,
    pub hrv_sdnn_ms: Option<f64>,
    pub systolic_bp: Option<f64>,
    pub diastolic_bp: Option<f64>,
    pub oxygen_saturation: Option<f64>,
    pub temperature: Option<f64>,
}

impl From<PersonalInfo> for PersonalInfoPatch {
    fn from(info: PersonalInfo) -> Self {
        Self {
            full_name: Some(info.full_name),
            email: Some(info.email),
            phone: Some(info.phone),
            nationality_id: info.nationality_id,
            consent: Some(info.consent),
            agree: Some(info.agree),
        }
    }
}

impl From<Vitals> for VitalsPatch {
    fn from(v: Vitals) -> Self {
        Self {
            heart_rate: Some(v.heart_rate),
            blood_pressure: Some(v.blood_pressure),
            breathing_rate: Some(v.breathing_rate),
            hrv_sdnn_ms: Some(v.hrv_sdnn_ms),
            systolic_bp: Some(v.systolic_bp),
            diastolic_bp: Some(v.diastolic_bp),
            oxygen_saturation: Some(v.oxygen_saturation),
            temperature: Some(v.temperature),
        }
    }
}

impl UserDataPatch {
    pub fn complaint(complaint: impl Into<String>) -> Self {
        Self {
            complaint: Some(complaint.into()),
            ..Default::default()
        }
    }

    pub fn personal_info(info: PersonalInfo) -> Self {
        Self {
            personal_info: Some(info.into()),
            ..Default::default()
        }
    }

    pub fn vitals(vitals: Vitals) -> Self {
        Self {
            vitals: Some(vitals.into()),
            ..Default::default()
        }
    }
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}

impl UserData {
    /// Apply a partial update. Only keys present in the patch overwrite;
    /// nested sections merge field by field.
    pub fn merge(&mut self, patch: UserDataPatch) {
        set(&mut self.id, patch.id);
        set(&mut self.age, patch.age);
        if patch.gender.is_some() {
            self.gender = patch.gender;
        }
        set(&mut self.complaint, patch.complaint);

        if let Some(p) = patch.personal_info {
            let info = &mut self.personal_info;
            set(&mut info.full_name, p.full_name);
            set(&mut info.email, p.email);
            set(&mut info.phone, p.phone);
            if p.nationality_id.is_some() {
                info.nationality_id = p.nationality_id;
            }
            set(&mut info.consent, p.consent);
            set(&mut info.agree, p.agree);
        }

        if let Some(v) = patch.vitals {
            let vitals = &mut self.vitals;
            set(&mut vitals.heart_rate, v.heart_rate);
            set(&mut vitals.blood_pressure, v.blood_pressure);
            set(&mut vitals.breathing_rate, v.breathing_rate);
            set(&mut vitals.hrv_sdnn_ms, v.hrv_sdnn_ms);
            set(&mut vitals.systolic_bp, v.systolic_bp);
            set(&mut vitals.diastolic_bp, v.diastolic_bp);
            set(&mut vitals.oxygen_saturation, v.oxygen_saturation);
            set(&mut vitals.temperature, v.temperature);
        }
    }
}

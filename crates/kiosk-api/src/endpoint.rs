use std::fmt;

/// Every backend endpoint the kiosk calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    AddOrUpdateClient,
    EditClient,
    EditClientHealthConcern,
    GetClient,
    LatestScanResult,
    AddScanResult,
    ArrhythmiaRequests,
    AddArrhythmiaRequest,
    EditArrhythmiaQuestionnaire,
    SendMedicalReport,
}

impl Endpoint {
    /// Path relative to the API base URL.
    pub fn path(self) -> &'static str {
        match self {
            Self::AddOrUpdateClient => "client/AddOrUpdateClient",
            Self::EditClient => "client/EditClient",
            Self::EditClientHealthConcern => "client/EditClientHealthConcern",
            Self::GetClient => "client/GetClient",
            Self::LatestScanResult => "ScanResult/GetClientLatestScanResult",
            Self::AddScanResult => "ScanResult/AddScanResult",
            Self::ArrhythmiaRequests => "Arrhythmia/GetArrhythmiaRequests",
            Self::AddArrhythmiaRequest => "Arrhythmia/AddArrhythmiaRequest",
            Self::EditArrhythmiaQuestionnaire => "Arrhythmia/EditArrhythmiaQuestionnaire",
            Self::SendMedicalReport => "email/SendMedicalReport",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

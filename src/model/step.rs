//! Form pages of the journey.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Every form page in the journey.
///
/// The path segment of each variant is part of the public URL surface and
/// must stay stable across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepId {
    Start,
    HowWeProcessRequests,
    BeforeYouStart,
    YouMayWantToCheckAncestry,
    IsServicePersonAlive,
    ServiceBranch,
    WereTheyACommissionedOfficer,
    WhatWasTheirDateOfBirth,
    DoYouHaveAProofOfDeath,
    AreYouSureYouWantToProceedWithoutProofOfDeath,
    UploadAProofOfDeath,
    ServicePersonDetails,
    HaveYouPreviouslyMadeARequest,
    ChooseYourOrderType,
    YourContactDetails,
    WhatIsYourAddress,
    YourOrderSummary,
    AreYouSureYouWantToCancel,
}

impl StepId {
    /// All steps, in journey order.
    pub const ALL: [Self; 18] = [
        Self::Start,
        Self::HowWeProcessRequests,
        Self::BeforeYouStart,
        Self::YouMayWantToCheckAncestry,
        Self::IsServicePersonAlive,
        Self::ServiceBranch,
        Self::WereTheyACommissionedOfficer,
        Self::WhatWasTheirDateOfBirth,
        Self::DoYouHaveAProofOfDeath,
        Self::AreYouSureYouWantToProceedWithoutProofOfDeath,
        Self::UploadAProofOfDeath,
        Self::ServicePersonDetails,
        Self::HaveYouPreviouslyMadeARequest,
        Self::ChooseYourOrderType,
        Self::YourContactDetails,
        Self::WhatIsYourAddress,
        Self::YourOrderSummary,
        Self::AreYouSureYouWantToCancel,
    ];

    /// The URL path segment for this step.
    pub fn path(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::HowWeProcessRequests => "how-we-process-requests",
            Self::BeforeYouStart => "before-you-start",
            Self::YouMayWantToCheckAncestry => "you-may-want-to-check-ancestry",
            Self::IsServicePersonAlive => "is-service-person-alive",
            Self::ServiceBranch => "which-military-branch-did-the-person-serve-in",
            Self::WereTheyACommissionedOfficer => "were-they-a-commissioned-officer",
            Self::WhatWasTheirDateOfBirth => "what-was-their-date-of-birth",
            Self::DoYouHaveAProofOfDeath => "provide-a-proof-of-death",
            Self::AreYouSureYouWantToProceedWithoutProofOfDeath => {
                "are-you-sure-you-want-to-proceed-without-proof-of-death"
            }
            Self::UploadAProofOfDeath => "upload-a-proof-of-death",
            Self::ServicePersonDetails => "service-person-details",
            Self::HaveYouPreviouslyMadeARequest => "have-you-previously-made-a-request",
            Self::ChooseYourOrderType => "choose-your-order-type",
            Self::YourContactDetails => "your-contact-details",
            Self::WhatIsYourAddress => "what-is-your-address",
            Self::YourOrderSummary => "your-order-summary",
            Self::AreYouSureYouWantToCancel => "are-you-sure-you-want-to-cancel",
        }
    }

    /// The page heading shown to the user.
    pub fn heading(self) -> &'static str {
        match self {
            Self::Start => "Request a military service record",
            Self::HowWeProcessRequests => "How we process requests",
            Self::BeforeYouStart => "Before you start",
            Self::YouMayWantToCheckAncestry => "You may want to check Ancestry",
            Self::IsServicePersonAlive => "Is the service person alive?",
            Self::ServiceBranch => "Which military branch did the person serve in?",
            Self::WereTheyACommissionedOfficer => "Were they a commissioned officer?",
            Self::WhatWasTheirDateOfBirth => "What was their date of birth?",
            Self::DoYouHaveAProofOfDeath => "Provide a proof of death",
            Self::AreYouSureYouWantToProceedWithoutProofOfDeath => {
                "Are you sure you want to proceed without a proof of death?"
            }
            Self::UploadAProofOfDeath => "Upload a proof of death",
            Self::ServicePersonDetails => "Tell us as much as you know about the service person",
            Self::HaveYouPreviouslyMadeARequest => {
                "Have you previously made a request for this record?"
            }
            Self::ChooseYourOrderType => "Choose your order type",
            Self::YourContactDetails => "Your contact details",
            Self::WhatIsYourAddress => "What is your address?",
            Self::YourOrderSummary => "Your order summary",
            Self::AreYouSureYouWantToCancel => "Are you sure you want to cancel?",
        }
    }

    /// Look up a step by its path segment.
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.trim_matches('/');
        Self::ALL.into_iter().find(|s| s.path() == path)
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

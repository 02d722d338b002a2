//! Lifecycle status enums mapping to SMALLINT lookup tables, plus the
//! participant pipeline transition table.
//!
//! Each enum variant's discriminant matches the seed data in the
//! corresponding `*_statuses` database table. Participant codes start at
//! 2: code 1 belonged to a retired pre-selection stage and stays
//! unassigned so historical rows keep their meaning.

use crate::types::StatusId;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Resolve a raw database status ID back to the enum.
            pub fn from_id(id: StatusId) -> Option<Self> {
                match id {
                    $( $val => Some(Self::$variant), )+
                    _ => None,
                }
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }
    };
}

define_status_enum! {
    /// Pipeline stage of one company's engagement with one requirement.
    ParticipantStatus {
        /// Company chosen for the requirement; no valid NDA yet.
        Selected = 2,
        /// NDA document sent to the company, awaiting the signed copy.
        NdaPending = 3,
        /// A valid signed NDA covers the (client, company) pair.
        NdaSigned = 4,
        /// Project documentation requested from the client side.
        DocsRequested = 5,
        /// Company received the project documentation.
        DocsReceived = 6,
        /// Company submitted its quotation to the organization.
        ProposalSent = 7,
        ProposalAccepted = 8,
        ProposalRejected = 9,
        ProjectStarted = 10,
        ProjectFinished = 11,
        ProjectCancelled = 12,
    }
}

define_status_enum! {
    /// Project request lifecycle status.
    ProjectRequestStatus {
        Open = 1,
        /// A client quotation summary has been generated for this request.
        QuotationGenerated = 2,
        Finished = 3,
        Cancelled = 4,
    }
}

impl ParticipantStatus {
    /// Status IDs of the terminal stages, in the shape SQL array filters
    /// expect.
    pub const TERMINAL_IDS: [StatusId; 3] = [
        ParticipantStatus::ProposalRejected as StatusId,
        ParticipantStatus::ProjectFinished as StatusId,
        ParticipantStatus::ProjectCancelled as StatusId,
    ];

    /// Stages a participant may legally move to from `self`.
    ///
    /// `Selected` may skip straight to `NdaSigned` because a valid NDA for
    /// the (client, company) pair can already exist from an earlier
    /// project request.
    pub fn successors(self) -> &'static [ParticipantStatus] {
        use ParticipantStatus::*;
        match self {
            Selected => &[NdaPending, NdaSigned],
            NdaPending => &[NdaSigned],
            NdaSigned => &[DocsRequested],
            DocsRequested => &[DocsReceived],
            DocsReceived => &[ProposalSent],
            ProposalSent => &[ProposalAccepted, ProposalRejected],
            ProposalAccepted => &[ProjectStarted],
            ProjectStarted => &[ProjectFinished, ProjectCancelled],
            ProposalRejected | ProjectFinished | ProjectCancelled => &[],
        }
    }

    /// Whether the pipeline allows a direct move from `self` to `to`.
    pub fn can_transition(self, to: ParticipantStatus) -> bool {
        self.successors().contains(&to)
    }

    /// Terminal stages have no successors; the engagement is over.
    pub fn is_terminal(self) -> bool {
        self.successors().is_empty()
    }

    /// Entry stage for a newly assigned company: straight to `NdaSigned`
    /// when a valid NDA already covers the (client, company) pair,
    /// otherwise `Selected`.
    pub fn entry(has_valid_nda: bool) -> Self {
        if has_valid_nda {
            ParticipantStatus::NdaSigned
        } else {
            ParticipantStatus::Selected
        }
    }
}

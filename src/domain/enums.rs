use crate::utils::error::GalileoError;
use std::fmt;
use std::str::FromStr;

/// Declares a closed string enum whose wire values are listed once and reused
/// by `FromStr`, `Display` and the serde impls.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl FromStr for $name {
            type Err = GalileoError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => Err(GalileoError::UnknownVariant {
                        field: stringify!($name).to_string(),
                        value: other.to_string(),
                        expected: [$($wire),+].join(", "),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

wire_enum! {
    /// Dataset partition a run belongs to.
    pub enum Split {
        Training => "training",
        Validation => "validation",
        Test => "test",
        Inference => "inference",
    }
}

wire_enum! {
    /// Third-party vendors a credential can be stored for.
    pub enum IntegrationName {
        Anthropic => "anthropic",
        AwsBedrock => "aws_bedrock",
        AwsSageMaker => "aws_sagemaker",
        Azure => "azure",
        Custom => "custom",
        Databricks => "databricks",
        LabelStudio => "labelstudio",
        Mistral => "mistral",
        Nvidia => "nvidia",
        OpenAi => "openai",
        VertexAi => "vertex_ai",
        Writer => "writer",
    }
}

wire_enum! {
    pub enum ProjectType {
        TrainingInference => "training_inference",
        PromptEvaluation => "prompt_evaluation",
        LlmMonitor => "llm_monitor",
        Protect => "protect",
        GenAi => "gen_ai",
    }
}

wire_enum! {
    /// `luna` runs the small in-house model, `plus` runs an LLM judge.
    pub enum ScorerModelType {
        Luna => "luna",
        Plus => "plus",
    }
}

wire_enum! {
    pub enum AwsCredentialType {
        KeySecret => "key_secret",
        AssumedRole => "assumed_role",
    }
}

wire_enum! {
    /// Tags of the built-in scorers, carried in the `name` field.
    pub enum ScorerKind {
        AgenticWorkflowSuccess => "agentic_workflow_success",
        Bleu => "bleu",
        ChunkAttributionUtilization => "chunk_attribution_utilization",
        Completeness => "completeness",
        ContextAdherence => "context_adherence",
        ContextRelevance => "context_relevance",
        Correctness => "correctness",
        GroundTruthAdherence => "ground_truth_adherence",
        InputPii => "input_pii",
        InputSexist => "input_sexist",
        InputTone => "input_tone",
        InputToxicity => "input_toxicity",
        InstructionAdherence => "instruction_adherence",
        OutputPii => "output_pii",
        OutputSexist => "output_sexist",
        OutputTone => "output_tone",
        OutputToxicity => "output_toxicity",
        PromptInjection => "prompt_injection",
        PromptPerplexity => "prompt_perplexity",
        Rouge => "rouge",
        ToolErrorRate => "tool_error_rate",
        ToolSelectionQuality => "tool_selection_quality",
        Uncertainty => "uncertainty",
    }
}

wire_enum! {
    /// Tags of customized LLM scorers, carried in the `scorer_name` field.
    pub enum CustomizedScorerKind {
        Groundedness => "_customized_groundedness",
        GroundTruthAdherence => "_customized_ground_truth_adherence",
        InstructionAdherence => "_customized_instruction_adherence",
    }
}

wire_enum! {
    /// Comparison applied by a scorer filter.
    pub enum FilterOperator {
        Eq => "eq",
        Ne => "ne",
        Contains => "contains",
        OneOf => "one_of",
        NotIn => "not_in",
    }
}

impl ScorerKind {
    /// Judge model family used when a payload does not name one.
    pub fn default_model_type(&self) -> ScorerModelType {
        match self {
            ScorerKind::AgenticWorkflowSuccess
            | ScorerKind::Correctness
            | ScorerKind::GroundTruthAdherence
            | ScorerKind::InstructionAdherence
            | ScorerKind::ToolErrorRate
            | ScorerKind::ToolSelectionQuality => ScorerModelType::Plus,
            _ => ScorerModelType::Luna,
        }
    }
}

impl CustomizedScorerKind {
    /// The built-in scorer this customization overrides.
    pub fn base_kind(&self) -> ScorerKind {
        match self {
            CustomizedScorerKind::Groundedness => ScorerKind::ContextAdherence,
            CustomizedScorerKind::GroundTruthAdherence => ScorerKind::GroundTruthAdherence,
            CustomizedScorerKind::InstructionAdherence => ScorerKind::InstructionAdherence,
        }
    }
}

use crate::groups::GroupsOption;
use frame_columnar::{DefaultPromotion, TypePromotion};
use serde::Deserialize;
use std::sync::Arc;

/// Where a summary request comes from. Only interactive callers get the grouping message.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallerContext {
    #[default]
    Interactive,
    Programmatic,
}

/// Per-call configuration for [`crate::summarise`].
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SummariseOptions {
    pub groups: GroupsOption,
    /// Report the chosen grouping when `groups` is unspecified.
    pub inform: bool,
    pub caller: CallerContext,
    /// Evaluate groups on the worker pool when the `parallel` feature is enabled.
    pub parallel: bool,
    #[serde(skip, default = "default_promotion")]
    pub promotion: Arc<dyn TypePromotion>,
}

fn default_promotion() -> Arc<dyn TypePromotion> {
    Arc::new(DefaultPromotion)
}

impl Default for SummariseOptions {
    fn default() -> Self {
        Self {
            groups: GroupsOption::Unspecified,
            inform: true,
            caller: CallerContext::Interactive,
            parallel: true,
            promotion: default_promotion(),
        }
    }
}

impl SummariseOptions {
    pub fn with_groups(mut self, groups: GroupsOption) -> Self {
        self.groups = groups;
        self
    }

    pub fn with_promotion(mut self, promotion: impl TypePromotion + 'static) -> Self {
        self.promotion = Arc::new(promotion);
        self
    }

    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    pub fn quiet(mut self) -> Self {
        self.inform = false;
        self
    }
}

//! Metrics definitions for the vanity resolver.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    Counter,
    Gauge,
    Histogram,
}

#[derive(Debug, Clone, Copy)]
pub struct MetricDef {
    pub name: &'static str,
    pub metric_type: MetricType,
    pub description: &'static str,
}

#[macro_export]
macro_rules! counter {
    ($def:expr) => {
        metrics::counter!($def.name)
    };
}

pub const REQUESTS: MetricDef = MetricDef {
    name: "vanity.requests",
    metric_type: MetricType::Counter,
    description: "Number of requests received",
};

pub const RESOLVE_HIT: MetricDef = MetricDef {
    name: "vanity.resolve.hit",
    metric_type: MetricType::Counter,
    description: "Number of requests that resolved to a registered package",
};

pub const RESOLVE_MISS: MetricDef = MetricDef {
    name: "vanity.resolve.miss",
    metric_type: MetricType::Counter,
    description: "Number of requests that matched no registered package",
};

pub const STORE_ERRORS: MetricDef = MetricDef {
    name: "vanity.store.errors",
    metric_type: MetricType::Counter,
    description: "Number of requests that failed on a store or record error",
};

pub const ALL_METRICS: &[MetricDef] = &[REQUESTS, RESOLVE_HIT, RESOLVE_MISS, STORE_ERRORS];

pub mod analyzer;
pub mod collector;
pub mod error;
pub mod graph;
pub mod resolver;
pub mod scanner;
pub mod table;

pub use analyzer::{build_graph, CodebaseAnalyzer};
pub use collector::{Collected, Origin, ProjectSource, SourceCollector};
pub use error::{AnalysisError, CollectError, ErrorDescriptor};
pub use graph::{GraphBuilder, GraphEdge, GraphLimits, GraphNode, GraphResult, GraphTotals, Role};
pub use resolver::PathResolver;
pub use scanner::FileScanner;
pub use table::{FileTable, SourceFile};

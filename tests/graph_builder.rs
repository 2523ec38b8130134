use repograph::core::{
    build_graph,
    graph::{GraphBuilder, GraphEdge, GraphLimits, Role},
    FileTable,
};

fn table(files: &[(&str, &str)]) -> FileTable {
    files.iter().copied().collect()
}

#[test]
fn empty_table_yields_empty_graph() {
    let result = build_graph(&FileTable::new(), GraphLimits::default());

    assert!(result.nodes.is_empty());
    assert!(result.edges.is_empty());
    assert_eq!(result.total.nodes, 0);
    assert_eq!(result.total.edges, 0);
    assert!(result.warning.is_none());
}

#[test]
fn app_page_imports_sibling() {
    let files = table(&[
        ("src/app/page.tsx", "import Foo from './foo'"),
        ("src/app/foo.ts", "export const Foo = 1;"),
    ]);

    let result = build_graph(&files, GraphLimits::default());

    let ids: Vec<_> = result.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["src/app/page.tsx", "src/app/foo.ts"]);
    assert!(result.nodes.iter().all(|n| n.role == Role::Page));
    assert_eq!(
        result.edges,
        vec![GraphEdge::new("src/app/page.tsx", "src/app/foo.ts")]
    );
    assert_eq!(result.total.nodes, 2);
    assert_eq!(result.total.edges, 1);

    let page = &result.nodes[0];
    assert_eq!(page.label, "page");
    assert_eq!(page.full_path, "src/app/page.tsx");
    assert_eq!(page.folder, "src/app");
}

#[test]
fn bare_imports_never_become_edges() {
    let files = table(&[
        ("src/lib/db.ts", "import { PrismaClient } from '@prisma/client';\nimport x from 'react';"),
        ("react", ""),
    ]);

    let result = build_graph(&files, GraphLimits::default());
    assert!(result.edges.is_empty());
    assert_eq!(result.total.nodes, 2);
}

#[test]
fn repeated_imports_produce_repeated_edges() {
    let files = table(&[
        (
            "src/hooks/use-project.tsx",
            "import { a } from '../lib/api';\nconst b = require('../lib/api');",
        ),
        ("src/lib/api.ts", ""),
    ]);

    let result = build_graph(&files, GraphLimits::default());
    assert_eq!(result.total.nodes, 2);
    assert_eq!(result.edges.len(), 2);
    assert_eq!(result.edges[0], result.edges[1]);
}

#[test]
fn unresolved_relative_imports_are_dropped() {
    let files = table(&[("src/index.ts", "import './missing';\nimport './styles.css';")]);

    let result = build_graph(&files, GraphLimits::default());
    assert_eq!(result.total.nodes, 1);
    assert_eq!(result.total.edges, 0);
}

#[test]
fn building_twice_is_identical() {
    let files = table(&[
        ("src/app/layout.tsx", "import Sidebar from '../components/sidebar';\nimport './page';"),
        ("src/app/page.tsx", "import { db } from '../server/db';\nconst m = import('../lib/meeting');"),
        ("src/components/sidebar.tsx", "import { useProject } from '../hooks/use-project';"),
        ("src/hooks/use-project.tsx", "import { api } from '../server/db';"),
        ("src/server/db.ts", ""),
        ("src/lib/meeting.ts", "export * from '../server/db';"),
    ]);

    let first = build_graph(&files, GraphLimits::default());
    let second = build_graph(&files, GraphLimits::default());

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn truncates_nodes_and_edges_but_reports_totals() {
    let mut files: Vec<(String, String)> = Vec::new();
    let hub_imports: String = (0..250)
        .map(|i| format!("import m{i} from './m{i}';\nimport n{i} from './m{i}';\n"))
        .collect();
    files.push(("src/hub.ts".to_string(), hub_imports));
    for i in 0..250 {
        files.push((format!("src/m{i}.ts"), String::new()));
    }
    let files: FileTable = files.into_iter().collect();

    let result = build_graph(&files, GraphLimits::default());

    assert_eq!(result.total.nodes, 251);
    assert_eq!(result.total.edges, 500);
    assert_eq!(result.nodes.len(), 200);
    assert_eq!(result.edges.len(), 400);
    assert_eq!(result.nodes[0].id, "src/hub.ts");
    assert_eq!(result.nodes[1].id, "src/m0.ts");
}

#[test]
fn custom_limits_apply() {
    let files = table(&[
        ("a/x.ts", "import './y'"),
        ("a/y.ts", "import './x'"),
    ]);
    let limits = GraphLimits {
        max_nodes: 1,
        max_edges: 1,
    };

    let result = build_graph(&files, limits);
    assert_eq!(result.nodes.len(), 1);
    assert_eq!(result.edges.len(), 1);
    assert_eq!(result.total.nodes, 2);
    assert_eq!(result.total.edges, 2);
}

#[test]
fn builder_deduplicates_nodes_by_key() {
    let mut gb = GraphBuilder::new();
    let a = gb.add_node("src/a.ts");
    let again = gb.add_node("src/a.ts");
    let b = gb.add_node("src/b.ts");
    gb.add_edge(a, b);
    gb.add_edge(again, b);

    assert_eq!(a, again);
    assert_eq!(gb.get_node_index("src/b.ts"), Some(b));
    let result = gb.build();
    assert_eq!(result.total.nodes, 2);
    assert_eq!(result.total.edges, 2);
}

#[test]
fn role_rules_apply_in_order() {
    assert_eq!(Role::classify("src/api/components/x.ts"), Role::Api);
    assert_eq!(Role::classify("src/app/api/graph/route.ts"), Role::Api);
    assert_eq!(Role::classify("src/components/theme-toggle.tsx"), Role::Component);
    assert_eq!(Role::classify("src/Component/x.tsx"), Role::Component);
    assert_eq!(Role::classify("src/pages/index.tsx"), Role::Page);
    assert_eq!(Role::classify("src/routes/page.tsx"), Role::Page);
    assert_eq!(Role::classify("src/lib/github.ts"), Role::Utility);
    assert_eq!(Role::classify("src/utils/format.ts"), Role::Utility);
    assert_eq!(Role::classify("src/hooks/use-project.tsx"), Role::Hook);
    assert_eq!(Role::classify("src/server/db.ts"), Role::Server);
    assert_eq!(Role::classify("src/middleware.ts"), Role::Other);
    assert_eq!(Role::classify("src/api.ts"), Role::Other);
}

#[test]
fn root_directory_name_is_ignored_for_roles() {
    let files = table(&[
        ("app/src/lib/utils.ts", ""),
        ("app/src/app/page.tsx", "import { x } from '../lib/utils'"),
    ])
    .with_root("app");
    let result = build_graph(&files, GraphLimits::default());

    assert_eq!(result.nodes[0].id, "app/src/lib/utils.ts");
    assert_eq!(result.nodes[0].role, Role::Utility);
    assert_eq!(result.nodes[0].folder, "app/src/lib");
    assert_eq!(result.nodes[1].role, Role::Page);
    assert_eq!(result.edges[0].target, "app/src/lib/utils.ts");
}

#[test]
fn roles_serialize_lowercase() {
    let files = table(&[("src/hooks/use-project.tsx", "")]);
    let result = build_graph(&files, GraphLimits::default());
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["nodes"][0]["role"], "hook");
    assert_eq!(json["nodes"][0]["fullPath"], "src/hooks/use-project.tsx");
    assert_eq!(json["total"]["nodes"], 1);
    assert!(json.get("warning").is_none());
}

//! Per-node admission checks.
//!
//! Decides whether a candidate service may be added to a node,
//! applying pinning, tainting, anti-affinity, and capacity rules in a
//! fixed precedence order.

use tracing::debug;

use fitgrid_catalog::{ContractViolation, Node, PlanResult, Service, Workload};

use crate::resources::{can_support, services_on, total_demand};

/// Whether `candidate` may be added to `node`.
///
/// Rules are evaluated in documented precedence order and short-circuit
/// on the first failure:
///
/// 1. Workload machine-set pinning (`uses_machines`)
/// 2. Node taint (`only_for` allow-list)
/// 3. The candidate avoids a service already on the node
/// 4. A service already on the node avoids the candidate
/// 5. Capacity for the candidate's whole co-placement group
///
/// `Ok(false)` is a normal outcome meaning "does not fit here", never
/// an error. The predicate does not assign anything; the caller mutates
/// its store only after an `Ok(true)`, and is responsible for not
/// double-counting across repeated calls.
///
/// Rule 5 demands room for every `runs_with` companion alongside the
/// candidate, since co-placed services always land together. It does
/// not re-check the companions' own pinning or avoidance against this
/// node, nor whether they are already placed elsewhere. Known
/// limitation, kept for compatibility with the planner's historical
/// behavior.
///
/// A candidate that belongs to no workload in `workloads` is a
/// [`ContractViolation`]: the catalogs are required to be internally
/// consistent before the engine is called.
pub fn can_admit(
    node: &Node,
    candidate: &Service,
    services: &[Service],
    workloads: &[Workload],
) -> PlanResult<bool> {
    let owner = workloads
        .iter()
        .find(|workload| workload.owns(candidate.id))
        .ok_or(ContractViolation::OrphanService(candidate.id))?;

    // Pinned workloads only land on their declared machine sets.
    if !owner.uses_machines.is_empty() && !owner.uses_machines.contains(&node.machine_set) {
        debug!(
            service = %candidate.name,
            node = node.id,
            machine_set = %node.machine_set,
            "denied: workload is pinned to other machine sets"
        );
        return Ok(false);
    }

    // Tainted node: reserved for the workloads it names.
    if !node.only_for.is_empty() && !node.only_for.contains(&owner.name) {
        debug!(
            service = %candidate.name,
            node = node.id,
            "denied: node is reserved for other workloads"
        );
        return Ok(false);
    }

    // Anti-affinity is binding no matter which side declared it.
    if node.services.iter().any(|id| candidate.avoid.contains(id)) {
        debug!(
            service = %candidate.name,
            node = node.id,
            "denied: candidate avoids a service on this node"
        );
        return Ok(false);
    }

    let assigned = services_on(node, services);

    if assigned.iter().any(|svc| svc.avoid.contains(&candidate.id)) {
        debug!(
            service = %candidate.name,
            node = node.id,
            "denied: a service on this node avoids the candidate"
        );
        return Ok(false);
    }

    // Co-placed services always land together, so demand room for the
    // whole group, not just the candidate.
    let current = total_demand(assigned);
    let group: Vec<&Service> = services
        .iter()
        .filter(|svc| candidate.runs_with.contains(&svc.id))
        .chain(std::iter::once(candidate))
        .collect();

    Ok(can_support(&total_demand(group), &current, node))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::ResourceDemand;
    use fitgrid_catalog::NodeVariant;

    fn make_service(id: u32, name: &str, cpu: u32, memory: u64) -> Service {
        Service {
            id,
            name: name.to_string(),
            zones: 1,
            cpu,
            memory,
            avoid: vec![],
            runs_with: vec![],
        }
    }

    fn make_workload(id: u32, name: &str, services: Vec<u32>) -> Workload {
        Workload {
            id,
            name: name.to_string(),
            count: 1,
            uses_machines: vec![],
            storage_capacity: 0,
            services,
            duplicate_of: None,
        }
    }

    fn make_node(cpu_units: u32, memory: u64, services: Vec<u32>) -> Node {
        Node {
            id: 1,
            cpu_units,
            memory,
            max_disks: 24,
            machine_set: "default".to_string(),
            label: "Worker Node".to_string(),
            only_for: vec![],
            services,
            variant: NodeVariant::BareMetal,
        }
    }

    #[test]
    fn admits_when_capacity_remains() {
        // 10+4 cpu <= 16, 40+16 memory <= 64.
        let services = vec![
            make_service(1, "resident", 4, 16),
            make_service(2, "incoming", 10, 40),
        ];
        let workloads = vec![make_workload(1, "app", vec![1, 2])];
        let node = make_node(16, 64, vec![1]);

        assert!(can_admit(&node, &services[1], &services, &workloads).unwrap());
    }

    #[test]
    fn denies_when_cpu_would_overflow() {
        // 14+4 cpu > 16 even though memory fits.
        let services = vec![
            make_service(1, "resident", 4, 16),
            make_service(2, "incoming", 14, 10),
        ];
        let workloads = vec![make_workload(1, "app", vec![1, 2])];
        let node = make_node(16, 64, vec![1]);

        assert!(!can_admit(&node, &services[1], &services, &workloads).unwrap());
    }

    #[test]
    fn pinned_workload_rejected_on_foreign_machine_set() {
        let services = vec![make_service(1, "db", 2, 8)];
        let mut workload = make_workload(1, "database", vec![1]);
        workload.uses_machines = vec!["db-nodes".to_string()];
        let workloads = vec![workload];

        let node = make_node(16, 64, vec![]); // machine_set = "default"
        assert!(!can_admit(&node, &services[0], &services, &workloads).unwrap());

        let mut pinned_node = make_node(16, 64, vec![]);
        pinned_node.machine_set = "db-nodes".to_string();
        assert!(can_admit(&pinned_node, &services[0], &services, &workloads).unwrap());
    }

    #[test]
    fn tainted_node_rejects_unlisted_workloads() {
        let services = vec![
            make_service(1, "db", 2, 8),
            make_service(2, "web", 2, 8),
        ];
        let workloads = vec![
            make_workload(1, "database", vec![1]),
            make_workload(2, "frontend", vec![2]),
        ];

        let mut node = make_node(16, 64, vec![]);
        node.only_for = vec!["database".to_string()];

        assert!(can_admit(&node, &services[0], &services, &workloads).unwrap());
        assert!(!can_admit(&node, &services[1], &services, &workloads).unwrap());
    }

    #[test]
    fn empty_only_for_means_unrestricted() {
        let services = vec![make_service(1, "web", 2, 8)];
        let workloads = vec![make_workload(1, "frontend", vec![1])];
        let node = make_node(16, 64, vec![]);

        assert!(can_admit(&node, &services[0], &services, &workloads).unwrap());
    }

    #[test]
    fn candidate_avoiding_a_resident_is_denied() {
        let mut incoming = make_service(2, "replica", 2, 8);
        incoming.avoid = vec![1];
        let services = vec![make_service(1, "primary", 2, 8), incoming];
        let workloads = vec![make_workload(1, "db", vec![1, 2])];
        let node = make_node(16, 64, vec![1]);

        assert!(!can_admit(&node, &services[1], &services, &workloads).unwrap());
    }

    #[test]
    fn resident_avoiding_the_candidate_is_denied() {
        // The avoidance is declared on the resident side only.
        let mut resident = make_service(1, "primary", 2, 8);
        resident.avoid = vec![2];
        let services = vec![resident, make_service(2, "replica", 2, 8)];
        let workloads = vec![make_workload(1, "db", vec![1, 2])];
        let node = make_node(16, 64, vec![1]);

        assert!(!can_admit(&node, &services[1], &services, &workloads).unwrap());
    }

    #[test]
    fn anti_affinity_is_symmetric() {
        let mut a = make_service(1, "a", 2, 8);
        a.avoid = vec![2];
        let b = make_service(2, "b", 2, 8);
        let services = vec![a, b];
        let workloads = vec![make_workload(1, "app", vec![1, 2])];

        // b onto a node holding a: denied by a's declaration.
        let node_with_a = make_node(16, 64, vec![1]);
        assert!(!can_admit(&node_with_a, &services[1], &services, &workloads).unwrap());

        // a onto a node holding b: denied by the same declaration.
        let node_with_b = make_node(16, 64, vec![2]);
        assert!(!can_admit(&node_with_b, &services[0], &services, &workloads).unwrap());
    }

    #[test]
    fn coplacement_group_must_fit_together() {
        // Candidate needs 4/16, companion needs 8/32; node has 10/64
        // free. Candidate alone fits, group does not.
        let mut candidate = make_service(1, "app", 4, 16);
        candidate.runs_with = vec![2];
        let services = vec![candidate, make_service(2, "sidecar", 8, 32)];
        let workloads = vec![make_workload(1, "app", vec![1, 2])];
        let node = make_node(10, 64, vec![]);

        assert!(!can_admit(&node, &services[0], &services, &workloads).unwrap());

        let roomier = make_node(12, 64, vec![]);
        assert!(can_admit(&roomier, &services[0], &services, &workloads).unwrap());
    }

    #[test]
    fn coplacement_group_constraints_not_rechecked() {
        // The companion avoids the resident, but only the candidate's
        // own constraints are evaluated: the group is checked for
        // capacity, not for avoidance. Documented asymmetry.
        let resident = make_service(1, "resident", 1, 4);
        let mut candidate = make_service(2, "app", 2, 8);
        candidate.runs_with = vec![3];
        let mut companion = make_service(3, "sidecar", 2, 8);
        companion.avoid = vec![1];
        let services = vec![resident, candidate, companion];
        let workloads = vec![
            make_workload(1, "base", vec![1]),
            make_workload(2, "app", vec![2, 3]),
        ];
        let node = make_node(16, 64, vec![1]);

        assert!(can_admit(&node, &services[1], &services, &workloads).unwrap());
    }

    #[test]
    fn dangling_runs_with_ids_drop_out_of_the_group() {
        let mut candidate = make_service(1, "app", 2, 8);
        candidate.runs_with = vec![99];
        let services = vec![candidate];
        let workloads = vec![make_workload(1, "app", vec![1])];
        let node = make_node(4, 16, vec![]);

        // Only the candidate itself is counted.
        assert!(can_admit(&node, &services[0], &services, &workloads).unwrap());
    }

    #[test]
    fn orphan_candidate_is_a_contract_violation() {
        let services = vec![make_service(1, "stray", 2, 8)];
        let workloads = vec![make_workload(1, "app", vec![2])];
        let node = make_node(16, 64, vec![]);

        let err = can_admit(&node, &services[0], &services, &workloads).unwrap_err();
        assert!(matches!(err, ContractViolation::OrphanService(1)));
    }

    #[test]
    fn admission_preserves_the_capacity_invariant() {
        // Whenever the predicate admits, assigning the candidate must
        // keep aggregate demand within capacity.
        let services = vec![
            make_service(1, "a", 5, 20),
            make_service(2, "b", 6, 24),
            make_service(3, "c", 6, 24),
        ];
        let workloads = vec![make_workload(1, "app", vec![1, 2, 3])];
        let mut node = make_node(16, 64, vec![]);

        for candidate in &services {
            if can_admit(&node, candidate, &services, &workloads).unwrap() {
                node.services.push(candidate.id);
                let usage = total_demand(services_on(&node, &services));
                assert!(usage.cpu <= node.cpu_units);
                assert!(usage.memory <= node.memory);
            }
        }

        // a (5/20) and b (6/24) fit; c (6/24) would push CPU to 17.
        assert_eq!(node.services, vec![1, 2]);
        let usage = total_demand(services_on(&node, &services));
        assert_eq!(usage, ResourceDemand { cpu: 11, memory: 44 });
    }
}

//! Domain types for the FitGrid capacity planner.
//!
//! These types mirror the entity collections held by the consuming
//! store: services grouped into workloads, machine-set templates, the
//! nodes built from them, and the zones that group nodes into fault
//! domains. The engine treats every collection as an immutable
//! snapshot; it never creates, persists, or destroys entities.

use serde::{Deserialize, Serialize};

use crate::error::{ContractViolation, PlanResult};

/// Unique identifier for a service.
pub type ServiceId = u32;

/// Unique identifier for a workload.
pub type WorkloadId = u32;

/// Unique identifier for a node.
pub type NodeId = u32;

/// Unique identifier for a zone.
pub type ZoneId = u32;

// ── Service ───────────────────────────────────────────────────────

/// An atomic deployable unit with its own resource footprint and
/// affinity rules.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Service {
    pub id: ServiceId,
    pub name: String,
    /// Number of zones this service replicates across.
    pub zones: u32,
    /// CPU units required per replica.
    pub cpu: u32,
    /// Memory required per replica (GiB).
    pub memory: u64,
    /// Services this one must never share a node with.
    pub avoid: Vec<ServiceId>,
    /// Services that must always be placed on the same node as this
    /// one.
    pub runs_with: Vec<ServiceId>,
}

// ── Workload ──────────────────────────────────────────────────────

/// A named application composed of one or more services.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Workload {
    pub id: WorkloadId,
    pub name: String,
    /// Desired replica count for the workload as a whole.
    pub count: u32,
    /// Machine sets this workload is pinned to. Empty = unpinned.
    pub uses_machines: Vec<String>,
    /// Requested storage capacity (GiB). Zero = no storage request.
    pub storage_capacity: u64,
    /// Member services.
    pub services: Vec<ServiceId>,
    /// Set when this workload is a copy of another. The consumer uses
    /// it for cleanup; the engine ignores it.
    pub duplicate_of: Option<WorkloadId>,
}

impl Workload {
    /// Whether `service` is a member of this workload.
    pub fn owns(&self, service: ServiceId) -> bool {
        self.services.contains(&service)
    }
}

// ── MachineSet ────────────────────────────────────────────────────

/// A template describing a class of interchangeable nodes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MachineSet {
    pub name: String,
    /// CPU units per node of this set.
    pub cpu: u32,
    /// Memory per node of this set (GiB).
    pub memory: u64,
    /// Node size label; used for public cloud instance types.
    pub instance_name: String,
    /// Usable disk slots per node of this set.
    pub number_of_disks: u32,
    /// Workloads allowed to use this set. Empty = any workload.
    pub only_for: Vec<String>,
    /// Label applied to nodes created from this set.
    pub label: String,
}

// ── Node ──────────────────────────────────────────────────────────

/// Platform-specific shape of a node.
///
/// Cloud variants carry the instance-type label of the machine they
/// model; bare-metal and virtualized nodes have none. Every variant
/// exposes the same capacity and restriction surface through the
/// [`Node`] fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "platform", rename_all = "snake_case")]
pub enum NodeVariant {
    BareMetal,
    Aws { instance_type: String },
    Gcp { instance_type: String },
    Azure { instance_type: String },
    Virtualized,
}

/// A concrete capacity-bearing unit produced from a machine set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    /// Identifier within the consumer's topology. The factory leaves
    /// it at zero; the consumer assigns it when adopting the node.
    pub id: NodeId,
    /// CPU capacity in units.
    pub cpu_units: u32,
    /// Memory capacity (GiB).
    pub memory: u64,
    /// Usable disk slots.
    pub max_disks: u32,
    /// Name of the machine set this node was built from.
    pub machine_set: String,
    pub label: String,
    /// Workloads allowed on this node. Inherited from the machine set,
    /// overridable per node. Empty = any workload.
    pub only_for: Vec<String>,
    /// Services currently assigned to this node.
    pub services: Vec<ServiceId>,
    pub variant: NodeVariant,
}

impl Node {
    /// The cloud instance-type label, when this node models a cloud
    /// instance.
    pub fn instance_type(&self) -> Option<&str> {
        match &self.variant {
            NodeVariant::Aws { instance_type }
            | NodeVariant::Gcp { instance_type }
            | NodeVariant::Azure { instance_type } => Some(instance_type),
            NodeVariant::BareMetal | NodeVariant::Virtualized => None,
        }
    }
}

// ── Zone ──────────────────────────────────────────────────────────

/// A fault domain grouping nodes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Zone {
    pub id: ZoneId,
    pub name: String,
    /// Member nodes.
    pub nodes: Vec<NodeId>,
}

// ── Platform ──────────────────────────────────────────────────────

/// Target platform a planning session models.
///
/// Selects which [`NodeVariant`] the node factory produces. VMware and
/// RHV are distinct tags but build the same virtualized variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    BareMetal,
    Aws,
    Gcp,
    Azure,
    Vmware,
    Rhv,
}

impl Platform {
    /// Parse a platform tag supplied by the consumer.
    ///
    /// The supported set is closed; an unknown tag means the consumer
    /// is presenting a platform the engine does not model, which is a
    /// contract violation and fatal for the caller.
    pub fn parse(tag: &str) -> PlanResult<Self> {
        match tag {
            "bare_metal" | "baremetal" => Ok(Self::BareMetal),
            "aws" => Ok(Self::Aws),
            "gcp" => Ok(Self::Gcp),
            "azure" => Ok(Self::Azure),
            "vmware" => Ok(Self::Vmware),
            "rhv" => Ok(Self::Rhv),
            other => Err(ContractViolation::UnknownPlatform(other.to_string())),
        }
    }
}

//! The mesh base: object table, indexes and lifecycle operations.

use crate::error::MeshError;
use crate::externalized::{ExternalizedMeshObject, ExternalizedRelationship};
use crate::identifier::{MeshBaseIdentifier, MeshObjectIdentifier};
use crate::object::{now_millis, AuditTimes, MeshObject, ObjId};
use ahash::AHashMap;
use meshweave_model::{MeshTypeIdentifier, ModelRegistry, PropertyValue};
use parking_lot::RwLock;
use roaring::RoaringBitmap;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Shared handle for embedding a base behind concurrent readers.
pub type SharedMeshBase = Arc<RwLock<MeshBase>>;

/// All mesh objects of one data source.
///
/// Objects are stored in a dense table indexed by [`ObjId`]; the home object
/// is created eagerly at slot 0 and never removed. An entity-type bitmap
/// index answers `objects_with_type` without scanning the table.
pub struct MeshBase {
    identifier: MeshBaseIdentifier,
    model: Arc<ModelRegistry>,
    objects: Vec<MeshObject>,
    by_identifier: AHashMap<MeshObjectIdentifier, ObjId>,
    type_index: HashMap<MeshTypeIdentifier, RoaringBitmap>,
}

impl MeshBase {
    /// Create an empty base for `identifier`. The home object exists
    /// immediately, carrying no entity types.
    pub fn new(identifier: MeshBaseIdentifier, model: Arc<ModelRegistry>) -> Self {
        let mut base = Self {
            identifier,
            model,
            objects: Vec::new(),
            by_identifier: AHashMap::new(),
            type_index: HashMap::new(),
        };
        let home = MeshObjectIdentifier::home(base.identifier.clone());
        let obj = MeshObject::new(ObjId::new(0), home.clone(), AuditTimes::now());
        base.by_identifier.insert(home, obj.id);
        base.objects.push(obj);
        base
    }

    /// A fresh base for a probe run: empty except for the home object.
    pub fn staging(data_source: &MeshBaseIdentifier, model: Arc<ModelRegistry>) -> Self {
        Self::new(data_source.clone(), model)
    }

    pub fn identifier(&self) -> &MeshBaseIdentifier {
        &self.identifier
    }

    pub fn model(&self) -> &Arc<ModelRegistry> {
        &self.model
    }

    pub fn home_id(&self) -> ObjId {
        ObjId::new(0)
    }

    pub fn home_object(&self) -> &MeshObject {
        &self.objects[0]
    }

    /// Number of objects, home included.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        // The home object always exists; "empty" means nothing was imported.
        self.objects.len() <= 1 && self.objects[0].types.is_empty()
    }

    pub fn object(&self, id: ObjId) -> Option<&MeshObject> {
        self.objects.get(id.raw() as usize)
    }

    pub fn find_by_identifier(&self, identifier: &MeshObjectIdentifier) -> Option<&MeshObject> {
        let id = self.by_identifier.get(identifier)?;
        self.object(*id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MeshObject> {
        self.objects.iter()
    }

    /// Objects blessed with exactly this entity type, in id order.
    pub fn objects_with_type(&self, entity_type: &MeshTypeIdentifier) -> Vec<ObjId> {
        self.type_index
            .get(entity_type)
            .map(|bitmap| bitmap.iter().map(ObjId::new).collect())
            .unwrap_or_default()
    }

    /// Whether the object carries `entity_type` or a subtype of it.
    pub fn satisfies_entity_type(&self, id: ObjId, entity_type: &MeshTypeIdentifier) -> bool {
        self.object(id).is_some_and(|obj| {
            obj.types
                .iter()
                .any(|t| self.model.is_subtype_of(t, entity_type))
        })
    }

    // ------------------------------------------------------------------
    // Creation and blessing
    // ------------------------------------------------------------------

    pub fn create_object(
        &mut self,
        identifier: MeshObjectIdentifier,
        entity_types: &[MeshTypeIdentifier],
    ) -> Result<ObjId, MeshError> {
        self.create_object_timed(identifier, entity_types, AuditTimes::now())
    }

    pub fn create_object_timed(
        &mut self,
        identifier: MeshObjectIdentifier,
        entity_types: &[MeshTypeIdentifier],
        times: AuditTimes,
    ) -> Result<ObjId, MeshError> {
        self.check_instantiable(entity_types)?;
        if self.by_identifier.contains_key(&identifier) {
            return Err(MeshError::IdentifierNotUnique(identifier.external_form()));
        }

        let id = ObjId::new(self.objects.len() as u32);
        let mut obj = MeshObject::new(id, identifier.clone(), times);
        obj.types.extend(entity_types.iter().cloned());
        self.by_identifier.insert(identifier, id);
        self.objects.push(obj);
        self.index_types(id, entity_types);
        debug!(object = %id, "created mesh object");
        Ok(id)
    }

    /// Create a placeholder for an object whose home is another base.
    pub fn create_forward_reference(
        &mut self,
        proxy: MeshBaseIdentifier,
        identifier: MeshObjectIdentifier,
        entity_types: &[MeshTypeIdentifier],
    ) -> Result<ObjId, MeshError> {
        let id = self.create_object_timed(identifier, entity_types, AuditTimes::now())?;
        self.objects[id.raw() as usize].proxy_towards_home = Some(proxy);
        Ok(id)
    }

    /// Add entity types to an existing object.
    pub fn bless(
        &mut self,
        id: ObjId,
        entity_types: &[MeshTypeIdentifier],
    ) -> Result<(), MeshError> {
        self.check_instantiable(entity_types)?;
        let external = self.external_form_of(id)?;
        let obj = &self.objects[id.raw() as usize];
        for entity_type in entity_types {
            if obj.types.contains(entity_type) {
                return Err(MeshError::EntityBlessedAlready {
                    object: external,
                    type_identifier: entity_type.clone(),
                });
            }
        }
        let obj = &mut self.objects[id.raw() as usize];
        obj.types.extend(entity_types.iter().cloned());
        obj.time_updated = now_millis();
        self.index_types(id, entity_types);
        Ok(())
    }

    /// Set replication-boundary hints carried by external documents.
    pub fn set_replica_hints(&mut self, id: ObjId, give_up_lock: bool, give_up_home: bool) {
        if let Some(obj) = self.objects.get_mut(id.raw() as usize) {
            obj.give_up_lock = give_up_lock;
            obj.give_up_home = give_up_home;
        }
    }

    /// Overwrite an object's audit times.
    ///
    /// Importers use this after applying properties and relationships, so
    /// that document-stated times win over the touch timestamps those
    /// mutations record.
    pub fn set_audit_times(&mut self, id: ObjId, times: AuditTimes) -> Result<(), MeshError> {
        let obj = self
            .objects
            .get_mut(id.raw() as usize)
            .ok_or(MeshError::ObjectNotFound(id))?;
        obj.time_created = times.created;
        obj.time_updated = times.updated;
        obj.time_read = times.read;
        obj.time_expires = times.expires;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------

    pub fn set_property(
        &mut self,
        id: ObjId,
        property: &MeshTypeIdentifier,
        value: PropertyValue,
    ) -> Result<(), MeshError> {
        let external = self.external_form_of(id)?;
        let property_type = self.model.find_property_type(property)?.clone();
        let obj = &self.objects[id.raw() as usize];
        if !self
            .model
            .property_declared_for(obj.types.iter(), &property_type)
        {
            return Err(MeshError::IllegalPropertyType {
                object: external,
                property: property.clone(),
            });
        }
        if property_type.is_read_only {
            return Err(MeshError::ReadOnlyProperty {
                property: property.clone(),
            });
        }
        property_type
            .data_type
            .accepts(&value)
            .map_err(|source| MeshError::IllegalPropertyValue {
                property: property.clone(),
                source,
            })?;
        let obj = &mut self.objects[id.raw() as usize];
        obj.properties.insert(property.clone(), value);
        obj.time_updated = now_millis();
        Ok(())
    }

    /// Current value of a declared property: the stored value, or the
    /// property type's default, or `None`.
    pub fn get_property(
        &self,
        id: ObjId,
        property: &MeshTypeIdentifier,
    ) -> Result<Option<PropertyValue>, MeshError> {
        let external = self.external_form_of(id)?;
        let property_type = self.model.find_property_type(property)?;
        let obj = &self.objects[id.raw() as usize];
        if !self
            .model
            .property_declared_for(obj.types.iter(), property_type)
        {
            return Err(MeshError::IllegalPropertyType {
                object: external,
                property: property.clone(),
            });
        }
        Ok(obj
            .properties
            .get(property)
            .cloned()
            .or_else(|| property_type.default_value.clone()))
    }

    // ------------------------------------------------------------------
    // Relationships
    // ------------------------------------------------------------------

    /// Create the (unblessed) edge between two objects.
    pub fn relate(&mut self, a: ObjId, b: ObjId) -> Result<(), MeshError> {
        if a == b {
            return Err(MeshError::CannotRelateToSelf);
        }
        let a_external = self.external_form_of(a)?;
        let b_external = self.external_form_of(b)?;
        if self.objects[a.raw() as usize].neighbors.contains_key(&b) {
            return Err(MeshError::RelatedAlready {
                a: a_external,
                b: b_external,
            });
        }
        let now = now_millis();
        let obj_a = &mut self.objects[a.raw() as usize];
        obj_a.neighbors.insert(b, Default::default());
        obj_a.time_updated = now;
        let obj_b = &mut self.objects[b.raw() as usize];
        obj_b.neighbors.insert(a, Default::default());
        obj_b.time_updated = now;
        Ok(())
    }

    /// Bless an existing edge with role types, named from `a`'s side.
    ///
    /// Each role identifier denotes the role `a` plays; `b` receives the
    /// opposite role of the same relationship type.
    pub fn bless_relationship(
        &mut self,
        a: ObjId,
        roles: &[MeshTypeIdentifier],
        b: ObjId,
    ) -> Result<(), MeshError> {
        let a_external = self.external_form_of(a)?;
        let b_external = self.external_form_of(b)?;
        if !self.objects[a.raw() as usize].neighbors.contains_key(&b) {
            return Err(MeshError::NotRelated {
                a: a_external,
                b: b_external,
            });
        }

        // Validate all roles before mutating anything.
        let mut resolved = Vec::with_capacity(roles.len());
        for role in roles {
            let (relationship, direction) = self.model.find_role_type(role)?;
            if relationship.is_abstract {
                return Err(MeshError::IsAbstract {
                    type_identifier: relationship.identifier.clone(),
                });
            }
            let my_role = relationship.role(direction);
            let other_role = relationship.role(direction.opposite());
            for (object, external, required) in [
                (a, &a_external, my_role.entity_type.clone()),
                (b, &b_external, other_role.entity_type.clone()),
            ] {
                if let Some(required) = required {
                    if !self.satisfies_entity_type(object, &required) {
                        return Err(MeshError::EntityNotBlessed {
                            object: external.clone(),
                            required,
                        });
                    }
                }
            }
            if self.objects[a.raw() as usize]
                .neighbors
                .get(&b)
                .is_some_and(|existing| existing.contains(role))
            {
                return Err(MeshError::RoleBlessedAlready {
                    a: a_external.clone(),
                    b: b_external.clone(),
                    role: role.clone(),
                });
            }
            resolved.push((role.clone(), other_role.identifier.clone()));
        }

        let now = now_millis();
        for (my_role, other_role) in resolved {
            let obj_a = &mut self.objects[a.raw() as usize];
            obj_a.neighbors.entry(b).or_default().insert(my_role);
            obj_a.time_updated = now;
            let obj_b = &mut self.objects[b.raw() as usize];
            obj_b.neighbors.entry(a).or_default().insert(other_role);
            obj_b.time_updated = now;
        }
        Ok(())
    }

    /// Neighbors reached over edges where `id` plays `role`.
    pub fn traverse(
        &self,
        id: ObjId,
        role: &MeshTypeIdentifier,
    ) -> Result<Vec<ObjId>, MeshError> {
        self.external_form_of(id)?;
        self.model.find_role_type(role)?;
        Ok(self.objects[id.raw() as usize]
            .neighbors
            .iter()
            .filter(|(_, roles)| roles.contains(role))
            .map(|(neighbor, _)| *neighbor)
            .collect())
    }

    // ------------------------------------------------------------------
    // Externalization
    // ------------------------------------------------------------------

    /// Flatten every object into its serde-friendly external form, home
    /// object first.
    pub fn externalize(&self) -> Vec<ExternalizedMeshObject> {
        self.objects
            .iter()
            .map(|obj| ExternalizedMeshObject {
                identifier: self.local_form(&obj.identifier),
                time_created: Some(obj.time_created),
                time_updated: Some(obj.time_updated),
                time_read: Some(obj.time_read),
                time_expires: obj.time_expires,
                give_up_lock: obj.give_up_lock,
                give_up_home: obj.give_up_home,
                proxy_towards_home: obj
                    .proxy_towards_home
                    .as_ref()
                    .map(|p| p.external_form().to_string()),
                mesh_types: obj.types.iter().cloned().collect(),
                properties: obj
                    .properties
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
                relationships: obj
                    .neighbors
                    .iter()
                    .map(|(neighbor, roles)| ExternalizedRelationship {
                        identifier: self.local_form(&self.objects[neighbor.raw() as usize].identifier),
                        role_types: roles.iter().cloned().collect(),
                    })
                    .collect(),
            })
            .collect()
    }

    /// Shortest external text for an identifier relative to this base.
    fn local_form(&self, identifier: &MeshObjectIdentifier) -> String {
        if identifier.base() == &self.identifier {
            if identifier.is_home() {
                String::new()
            } else {
                format!("#{}", identifier.local())
            }
        } else {
            identifier.external_form()
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    pub(crate) fn from_parts(
        identifier: MeshBaseIdentifier,
        model: Arc<ModelRegistry>,
        objects: Vec<MeshObject>,
    ) -> Option<Self> {
        if objects.first().map(|o| o.identifier.is_home()) != Some(true) {
            return None;
        }
        let mut base = Self {
            identifier,
            model,
            objects,
            by_identifier: AHashMap::new(),
            type_index: HashMap::new(),
        };
        for index in 0..base.objects.len() {
            let id = ObjId::new(index as u32);
            base.objects[index].id = id;
            base.by_identifier
                .insert(base.objects[index].identifier.clone(), id);
            let types: Vec<_> = base.objects[index].types.iter().cloned().collect();
            base.index_types(id, &types);
        }
        Some(base)
    }

    pub(crate) fn objects(&self) -> &[MeshObject] {
        &self.objects
    }

    fn check_instantiable(&self, entity_types: &[MeshTypeIdentifier]) -> Result<(), MeshError> {
        for entity_type in entity_types {
            let declared = self.model.find_entity_type(entity_type)?;
            if declared.is_abstract {
                return Err(MeshError::IsAbstract {
                    type_identifier: entity_type.clone(),
                });
            }
        }
        Ok(())
    }

    fn index_types(&mut self, id: ObjId, entity_types: &[MeshTypeIdentifier]) {
        for entity_type in entity_types {
            self.type_index
                .entry(entity_type.clone())
                .or_default()
                .insert(id.raw());
        }
    }

    fn external_form_of(&self, id: ObjId) -> Result<String, MeshError> {
        self.object(id)
            .map(|o| o.identifier.external_form())
            .ok_or(MeshError::ObjectNotFound(id))
    }
}

impl std::fmt::Debug for MeshBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeshBase")
            .field("identifier", &self.identifier)
            .field("objects", &self.objects.len())
            .finish()
    }
}

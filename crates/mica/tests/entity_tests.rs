//! Entity handle behavior, end to end through the `World` facade.

use bytemuck::{Pod, Zeroable};
use mica::{Entity, World};

#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
struct TestComponent {
    value: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
struct TestComponent2 {
    value: f32,
}

#[test]
fn add_component_to_entity() {
    let mut world = World::new();
    let mut entity = world.spawn();
    entity.add::<TestComponent>();
    assert!(entity.has::<TestComponent>());
    // A freshly added record is zeroed
    assert_eq!(entity.get::<TestComponent>(), Some(&TestComponent { value: 0 }));
}

#[test]
fn set_component_on_entity() {
    let mut world = World::new();
    let mut entity = world.spawn();
    entity.set(TestComponent { value: 42 });
    assert!(entity.has::<TestComponent>());
    assert_eq!(entity.get::<TestComponent>(), Some(&TestComponent { value: 42 }));
}

#[test]
fn add_then_set_chain() {
    let mut world = World::new();
    let mut entity = world.spawn();
    entity.add::<TestComponent>().set(TestComponent { value: 42 });
    assert_eq!(entity.get::<TestComponent>(), Some(&TestComponent { value: 42 }));
}

#[test]
fn multiple_components() {
    let mut world = World::new();
    let mut entity = world.spawn();
    entity
        .set(TestComponent { value: 42 })
        .set(TestComponent2 { value: 3.14 });

    assert!(entity.has::<TestComponent>());
    assert!(entity.has::<TestComponent2>());
    assert_eq!(entity.get::<TestComponent>(), Some(&TestComponent { value: 42 }));
    assert_eq!(entity.get::<TestComponent2>(), Some(&TestComponent2 { value: 3.14 }));
}

#[test]
fn remove_component() {
    let mut world = World::new();
    let mut entity = world.spawn();
    entity.add::<TestComponent>().remove::<TestComponent>();
    assert!(!entity.has::<TestComponent>());
    assert_eq!(entity.get::<TestComponent>(), None);
}

#[test]
fn get_mut_writes_through() {
    let mut world = World::new();
    let id = world.spawn().set(TestComponent { value: 1 }).id();

    world.entity(id).get_mut::<TestComponent>().unwrap().value = 7;
    assert_eq!(
        world.entity(id).get::<TestComponent>(),
        Some(&TestComponent { value: 7 })
    );
}

#[test]
fn composition_describes_held_types() {
    let mut world = World::new();
    let mut entity = world.spawn();
    entity
        .set(TestComponent { value: 1 })
        .set(TestComponent2 { value: 2.0 });

    let composition = entity.composition();
    let rendered = composition.to_string();
    assert!(rendered.contains("TestComponent"));
    assert!(rendered.contains(", "));
    assert_eq!(composition.names().len(), 2);
}

#[test]
fn destroy_consumes_the_entity() {
    let mut world = World::new();
    let id = world.spawn().set(TestComponent { value: 5 }).id();

    world.entity(id).destroy();

    assert!(!world.entity(id).is_valid());
    assert!(!world.entity(id).has::<TestComponent>());
}

#[test]
fn invalid_handle_is_inert() {
    let mut world = World::new();
    let mut ghost = world.entity(Entity::INVALID);

    assert!(!ghost.is_valid());
    assert!(!ghost.has::<TestComponent>());
    assert_eq!(ghost.get::<TestComponent>(), None);
    assert!(ghost.composition().is_empty());
}

#[test]
fn invalid_handle_rejects_mutations() {
    let mut world = World::new();

    // Looking up an unbound name yields the sentinel id; storing through
    // that handle must not create a phantom pool member.
    world
        .lookup("Nobody")
        .set(TestComponent { value: 9 })
        .add::<TestComponent2>();

    assert!(!world.entity(Entity::INVALID).has::<TestComponent>());
    assert!(!world.entity(Entity::INVALID).has::<TestComponent2>());

    let mut visited = 0;
    world.view::<(TestComponent,)>().each(|_, _| visited += 1);
    assert_eq!(visited, 0);
}

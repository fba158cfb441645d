//! Property tests over randomly generated contributor sets.

use proptest::prelude::*;
use splice_compose::headless::StaticContributor;
use splice_compose::{ContributorId, Item};
use splice_descriptor::{ContainerDecl, DescriptorNode, EntryDecl};

use crate::common::{Engine, assert_mirrored, engine, is_pristine};

#[derive(Debug, Clone, Copy)]
enum Leaf {
	Entry,
	GroupedEntry,
	Separator,
	Merge,
	MergeNamed,
	DefineGroup,
	ActionList,
}

#[derive(Debug, Clone)]
struct MenuShape {
	identity: Option<&'static str>,
	leaves: Vec<Leaf>,
	submenu: Vec<Leaf>,
}

fn arb_leaf() -> impl Strategy<Value = Leaf> {
	prop_oneof![
		6 => Just(Leaf::Entry),
		1 => Just(Leaf::GroupedEntry),
		1 => Just(Leaf::Separator),
		1 => Just(Leaf::Merge),
		1 => Just(Leaf::MergeNamed),
		1 => Just(Leaf::DefineGroup),
		1 => Just(Leaf::ActionList),
	]
}

fn arb_menu() -> impl Strategy<Value = MenuShape> {
	(
		prop::option::weighted(0.8, prop::sample::select(vec!["file", "edit", "view"])),
		prop::collection::vec(arb_leaf(), 0..8),
		prop::collection::vec(arb_leaf(), 0..4),
	)
		.prop_map(|(identity, leaves, submenu)| MenuShape { identity, leaves, submenu })
}

fn arb_contributors(max: usize) -> impl Strategy<Value = Vec<Vec<MenuShape>>> {
	prop::collection::vec(prop::collection::vec(arb_menu(), 1..4), 1..max)
}

/// Builds the contributor `id` and returns it with the number of entries it declares.
fn build(id: &str, menus: &[MenuShape]) -> (StaticContributor, usize) {
	let mut counter = 0;
	let mut leaves = |shapes: &[Leaf]| -> Vec<DescriptorNode> {
		shapes
			.iter()
			.map(|leaf| match leaf {
				Leaf::Entry | Leaf::GroupedEntry => {
					counter += 1;
					let entry = EntryDecl::new(format!("{id}.{counter}"));
					match leaf {
						Leaf::GroupedEntry => DescriptorNode::from(entry.in_group("g")),
						_ => DescriptorNode::from(entry),
					}
				}
				Leaf::Separator => DescriptorNode::separator(),
				Leaf::Merge => DescriptorNode::merge(),
				Leaf::MergeNamed => DescriptorNode::merge_named("plugins"),
				Leaf::DefineGroup => DescriptorNode::define_group("g"),
				Leaf::ActionList => DescriptorNode::action_list("recent"),
			})
			.collect()
	};

	let mut gui = ContainerDecl::new("gui");
	for menu in menus {
		let mut decl = match menu.identity {
			Some(identity) => ContainerDecl::new("menu").with_identity(identity),
			None => ContainerDecl::new("toolbar"),
		};
		decl = decl.children_from(leaves(&menu.leaves));
		if !menu.submenu.is_empty() {
			decl.push(ContainerDecl::new("menu").with_identity("more").children_from(leaves(&menu.submenu)));
		}
		gui.push(decl);
	}
	(StaticContributor::new(id, gui), counter)
}

fn entries_of(engine: &Engine, id: &ContributorId) -> usize {
	let tree = engine.tree();
	tree.preorder()
		.into_iter()
		.flat_map(|node| tree[node].items())
		.filter(|item| matches!(item, Item::Entry { contributor, list: None, .. } if contributor == id))
		.count()
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(64))]

	/// Attaching then detaching a guest leaves any prior tree untouched.
	#[test]
	fn prop_guest_round_trip(hosts in arb_contributors(4), guest in prop::collection::vec(arb_menu(), 1..4)) {
		let hosts: Vec<_> = hosts.iter().enumerate().map(|(i, menus)| build(&format!("host{i}"), menus).0).collect();
		let (guest, _) = build("guest", &guest);

		let mut engine = engine();
		for host in &hosts {
			engine.add_contributor(host);
		}
		engine.plug_action_list(&ContributorId::new("host0"), "recent", vec!["r1".into(), "r2".into()]).unwrap();
		let before = engine.snapshot();

		engine.add_contributor(&guest);
		engine.plug_action_list(&ContributorId::new("guest"), "recent", vec!["g1".into()]).unwrap();
		prop_assert!(engine.validate().is_ok());
		assert_mirrored(&engine);

		engine.remove_contributor(&guest);
		prop_assert_eq!(engine.snapshot(), before);
		assert_mirrored(&engine);
	}

	/// Every declared entry is present exactly once while its contributor is attached.
	#[test]
	fn prop_entries_are_conserved(shapes in arb_contributors(5)) {
		let built: Vec<_> = shapes.iter().enumerate().map(|(i, menus)| build(&format!("c{i}"), menus)).collect();

		let mut engine = engine();
		for (contributor, _) in &built {
			engine.add_contributor(contributor);
		}
		prop_assert!(engine.validate().is_ok());
		for (i, (_, declared)) in built.iter().enumerate() {
			prop_assert_eq!(entries_of(&engine, &ContributorId::new(format!("c{i}"))), *declared);
		}
	}

	/// Detaching everyone, in any order, leaves an empty root behind.
	#[test]
	fn prop_any_removal_order_empties_the_tree(
		shapes in arb_contributors(5),
		order in any::<u64>(),
	) {
		let built: Vec<_> = shapes.iter().enumerate().map(|(i, menus)| build(&format!("c{i}"), menus).0).collect();

		let mut engine = engine();
		for contributor in &built {
			engine.add_contributor(contributor);
		}

		let mut remaining: Vec<_> = built.iter().collect();
		let mut seed = order;
		while !remaining.is_empty() {
			let pick = (seed % remaining.len() as u64) as usize;
			seed = seed.rotate_left(7) ^ 0x9e37_79b9_7f4a_7c15;
			engine.remove_contributor(remaining.swap_remove(pick));
			prop_assert!(engine.validate().is_ok());
			assert_mirrored(&engine);
		}
		prop_assert!(is_pristine(&engine));
		prop_assert_eq!(engine.builder().len(), 1);
	}
}

use parse_dts::ast::func::Accessibility;
use parse_dts::ast::member::ClassMember;
use parse_dts::ast::member::MemberKey;
use parse_dts::ast::member::MemberKind;
use parse_dts::ast::node::Node;
use parse_dts::source::SourceFile;

/// Whether a class or interface member belongs to the public API. Protected members count.
pub fn is_public(member: &ClassMember) -> bool {
  if matches!(member.key.as_ref().map(|k| k.stx.as_ref()), Some(MemberKey::Computed(_))) {
    return false;
  }
  !member.is_private() && !member.key_text().starts_with('_')
}

pub fn is_protected(member: &ClassMember) -> bool {
  member.modifiers.accessibility == Some(Accessibility::Protected)
}

/// Orders members as non-static before static, then by kind, then by name.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct MemberSortKey {
  pub is_static: bool,
  pub kind_rank: u8,
  pub display_name: String,
}

/// The sort key of a member, or `None` for members that have no place in the order, such as
/// stray semicolons and static blocks.
pub fn sort_key(source: &SourceFile, member: &ClassMember) -> Option<MemberSortKey> {
  let (kind_rank, display_name) = match &member.kind {
    MemberKind::Property { .. } | MemberKind::Getter { .. } | MemberKind::Setter { .. } => {
      (0, member.key_text().to_string())
    }
    MemberKind::CallSignature { .. } => (1, String::new()),
    MemberKind::Constructor { .. } => (2, "constructor".to_string()),
    MemberKind::ConstructSignature { .. } => (2, "new".to_string()),
    MemberKind::IndexSignature { parameter, .. } => (3, source.text(parameter.loc).to_string()),
    MemberKind::Method { .. } => (4, member.key_text().to_string()),
    MemberKind::Semicolon | MemberKind::StaticBlock { .. } => return None,
  };
  Some(MemberSortKey {
    is_static: member.modifiers.static_,
    kind_rank,
    display_name,
  })
}

/// Sorts members into canonical order. The sort is stable, so overloads keep their relative
/// order. If any member has no sort key the original order is kept as is.
pub fn sort_members<'a>(
  source: &SourceFile,
  members: impl IntoIterator<Item = &'a Node<ClassMember>>,
) -> Vec<&'a Node<ClassMember>> {
  let members: Vec<&Node<ClassMember>> = members.into_iter().collect();
  let keys: Option<Vec<MemberSortKey>> = members.iter().map(|m| sort_key(source, &m.stx)).collect();
  let Some(keys) = keys else {
    return members;
  };
  let mut keyed: Vec<(MemberSortKey, &Node<ClassMember>)> = keys.into_iter().zip(members).collect();
  keyed.sort_by(|a, b| a.0.cmp(&b.0));
  keyed.into_iter().map(|(_, m)| m).collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use parse_dts::ast::stmt::Stmt;
  use parse_dts::parse;

  fn sorted_keys(body: &str) -> Vec<String> {
    let file = parse(&format!("declare class A {{ {body} }}")).unwrap();
    let Stmt::Class(class) = file.top_level.stx.body[0].stx.as_ref() else {
      panic!("expected a class");
    };
    sort_members(&file, class.stx.members.iter().filter(|m| is_public(&m.stx)))
      .into_iter()
      .map(|m| {
        let Some(key) = sort_key(&file, &m.stx) else {
          return "?".to_string();
        };
        let prefix = if key.is_static { "static " } else { "" };
        format!("{prefix}{}:{}", key.kind_rank, key.display_name)
      })
      .collect()
  }

  #[test]
  fn orders_by_static_then_kind_then_name() {
    let keys = sorted_keys(
      "static s(): void; m(): void; b: string; constructor(); [k: string]: any; a: number; \
       static p: number; get g(): number;",
    );
    assert_eq!(keys, [
      "0:a",
      "0:b",
      "0:g",
      "2:constructor",
      "3:k: string",
      "4:m",
      "static 0:p",
      "static 4:s",
    ]);
  }

  #[test]
  fn input_order_does_not_matter() {
    assert_eq!(
      sorted_keys("b: string; a: number; c(): void;"),
      sorted_keys("c(): void; a: number; b: string;")
    );
  }

  #[test]
  fn filters_non_public_members() {
    let keys = sorted_keys(
      "private a; #b: string; _c: number; [Symbol.iterator](): any; protected d: number; e: number;",
    );
    assert_eq!(keys, ["0:d", "0:e"]);
  }

  #[test]
  fn keeps_order_when_a_member_cannot_be_ranked() {
    let keys = sorted_keys("b: string; ; a: number;");
    assert_eq!(keys, ["0:b", "?", "0:a"]);
  }
}

use dlg_core::{
    CallData, DialogueAttributes, DisplayType, DlgError, Expression, FlowChart, FlowChartNode,
    Link, LogicalOperator, NodeKind, Persistence, PlayType, QuestionDisplay, ScriptCall,
};

use crate::xml::{parse_xml_document, XmlElementNode};

const CONVERSATION_ROOT: &str = "ConversationData";

/// Decoded `.conversation` file, before the id map is built.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationDocument {
    pub next_node_id: i32,
    pub nodes: Vec<FlowChartNode>,
}

impl ConversationDocument {
    pub fn into_flowchart(self) -> Result<FlowChart, DlgError> {
        FlowChart::new(self.next_node_id, self.nodes)
    }
}

pub fn parse_conversation_xml(source: &str) -> Result<ConversationDocument, DlgError> {
    let document = parse_xml_document(source)?;
    let root = &document.root;
    if root.name != CONVERSATION_ROOT {
        return Err(DlgError::malformed_document(format!(
            "expected <{}> root, found <{}>.",
            CONVERSATION_ROOT, root.name
        )));
    }

    let next_node_id = root.value_or("NextNodeID", 0)?;
    let nodes = root
        .list("Nodes")
        .into_iter()
        .map(parse_node)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ConversationDocument {
        next_node_id,
        nodes,
    })
}

pub fn parse_flowchart_xml(source: &str) -> Result<FlowChart, DlgError> {
    parse_conversation_xml(source)?.into_flowchart()
}

fn parse_node(element: &XmlElementNode) -> Result<FlowChartNode, DlgError> {
    let type_name = element.xsi_type().unwrap_or(element.name.as_str());
    let id = element.required_value("NodeID")?;

    let kind = match type_name {
        "TalkNode" => NodeKind::Talk {
            dialogue: parse_dialogue(element)?,
            speaker_guid: element.child_text("SpeakerGuid").unwrap_or_default(),
            listener_guid: element.child_text("ListenerGuid").unwrap_or_default(),
            actor_direction: element.child_text("ActorDirection").unwrap_or_default(),
        },
        "PlayerResponseNode" => NodeKind::PlayerResponse {
            dialogue: parse_dialogue(element)?,
        },
        "ScriptNode" => NodeKind::Script {
            dialogue: parse_dialogue(element)?,
        },
        "TriggerConversationNode" => NodeKind::TriggerConversation {
            dialogue: parse_dialogue(element)?,
            conversation_filename: element.child_text("ConversationFilename").unwrap_or_default(),
            start_node_id: element.value_or("StartNodeID", 0)?,
        },
        "BankNode" => NodeKind::Bank {
            child_node_ids: element
                .list("ChildNodeIDs")
                .into_iter()
                .map(XmlElementNode::value)
                .collect::<Result<Vec<_>, _>>()?,
        },
        other => {
            return Err(DlgError::UnsupportedNodeType {
                type_name: other.to_string(),
            })
        }
    };

    let container: i32 = element.value_or("ContainerNodeID", -1)?;
    let links = element
        .list("Links")
        .into_iter()
        .map(|link| parse_link(id, link))
        .collect::<Result<Vec<_>, _>>()?;
    let conditionals = match element.child("Conditionals") {
        Some(conditionals) => parse_combination(conditionals)?,
        None => Expression::always(),
    };

    Ok(FlowChartNode {
        id,
        container_node_id: (container >= 0).then_some(container),
        comments: element.child_text("Comments").unwrap_or_default(),
        package_id: element.value_or("PackageID", 0)?,
        links,
        conditionals,
        on_enter: parse_scripts(element, "OnEnterScripts")?,
        on_exit: parse_scripts(element, "OnExitScripts")?,
        on_update: parse_scripts(element, "OnUpdateScripts")?,
        kind,
    })
}

fn parse_dialogue(element: &XmlElementNode) -> Result<DialogueAttributes, DlgError> {
    Ok(DialogueAttributes {
        is_question_node: element.bool_or("IsQuestionNode", false)?,
        not_skippable: element.bool_or("NotSkippable", false)?,
        is_temp_text: element.bool_or("IsTempText", false)?,
        play_vo_as_3d_sound: element.bool_or("PlayVOAs3DSound", false)?,
        play_type: element.enum_or("PlayType", PlayType::Normal, PlayType::parse)?,
        persistence: element.enum_or("Persistence", Persistence::None, Persistence::parse)?,
        no_play_random_weight: element.value_or("NoPlayRandomWeight", 0)?,
        display_type: element.enum_or(
            "DisplayType",
            DisplayType::Conversation,
            DisplayType::parse,
        )?,
        vo_filename: element.child_text("VOFilename").unwrap_or_default(),
        voice_type: element.child_text("VoiceType").unwrap_or_default(),
    })
}

fn parse_link(from_node_id: i32, element: &XmlElementNode) -> Result<Link, DlgError> {
    match element.xsi_type() {
        None | Some("DialogueLink") | Some("FlowChartLink") => {}
        Some(other) => {
            return Err(DlgError::malformed_document(format!(
                "line {}: unsupported link type \"{}\".",
                element.line, other
            )))
        }
    }

    let declared_from = element.value_or("FromNodeID", from_node_id)?;
    if declared_from != from_node_id {
        return Err(DlgError::LinkSourceMismatch {
            expected: from_node_id,
            found: declared_from,
        });
    }

    Ok(Link {
        from_node_id,
        to_node_id: element.required_value("ToNodeID")?,
        points_to_ghost: element.bool_or("PointsToGhost", false)?,
        random_weight: element.value_or("RandomWeight", 1)?,
        question_node_text_display: element.enum_or(
            "QuestionNodeTextDisplay",
            QuestionDisplay::ShowOnce,
            QuestionDisplay::parse,
        )?,
        play_question_node_vo: element.bool_or("PlayQuestionNodeVO", true)?,
    })
}

fn parse_component(element: &XmlElementNode) -> Result<Expression, DlgError> {
    match element.xsi_type() {
        Some("ConditionalCall") => {
            let call = parse_call_data(element.required_child("Data")?)?;
            Ok(Expression::call(call, element.bool_or("Not", false)?))
        }
        Some("ConditionalExpression") => parse_combination(element),
        other => Err(DlgError::malformed_document(format!(
            "line {}: unsupported expression component type \"{}\".",
            element.line,
            other.unwrap_or_default()
        ))),
    }
}

fn parse_combination(element: &XmlElementNode) -> Result<Expression, DlgError> {
    let operator = element.enum_or("Operator", LogicalOperator::And, LogicalOperator::parse)?;
    let operands = element
        .list("Components")
        .into_iter()
        .map(parse_component)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Expression::combination(operator, operands))
}

fn parse_scripts(element: &XmlElementNode, name: &str) -> Result<Vec<ScriptCall>, DlgError> {
    element
        .list(name)
        .into_iter()
        .map(|script| -> Result<ScriptCall, DlgError> {
            let data = script.required_child("Data")?;
            Ok(ScriptCall::new(parse_call_data(data)?))
        })
        .collect()
}

fn parse_call_data(data: &XmlElementNode) -> Result<CallData, DlgError> {
    let full_name = data.required_child("FullName")?.text();
    let arguments = data
        .list("Parameters")
        .into_iter()
        .map(XmlElementNode::text)
        .collect();
    CallData::from_signature(full_name.trim(), arguments)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<ConversationData xmlns:xsd="http://www.w3.org/2001/XMLSchema" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#;

    fn document(nodes: &str) -> String {
        format!(
            "{}<NextNodeID>9</NextNodeID><Nodes>{}</Nodes></ConversationData>",
            HEADER, nodes
        )
    }

    const GUARDED_TALK: &str = r#"
<FlowChartNode xsi:type="TalkNode">
  <NodeID>0</NodeID>
  <ContainerNodeID>-1</ContainerNodeID>
  <Links>
    <FlowChartLink xsi:type="DialogueLink">
      <FromNodeID>0</FromNodeID>
      <ToNodeID>1</ToNodeID>
      <PointsToGhost>true</PointsToGhost>
      <RandomWeight>2</RandomWeight>
      <PlayQuestionNodeVO>false</PlayQuestionNodeVO>
      <QuestionNodeTextDisplay>ShowAlways</QuestionNodeTextDisplay>
    </FlowChartLink>
  </Links>
  <Conditionals>
    <Operator>And</Operator>
    <Components>
      <ExpressionComponent xsi:type="ConditionalCall">
        <Data>
          <FullName>Boolean IsGlobalValue(String, Operator, Int32)</FullName>
          <Parameters><string>bMetEder</string><string>EqualTo</string><string>1</string></Parameters>
        </Data>
        <Not>true</Not>
        <Operator>And</Operator>
      </ExpressionComponent>
      <ExpressionComponent xsi:type="ConditionalExpression">
        <Operator>Or</Operator>
        <Components>
          <ExpressionComponent xsi:type="ConditionalCall">
            <Data>
              <FullName>Boolean IsPlayerBackground(Background)</FullName>
              <Parameters><string>Mercenary</string></Parameters>
            </Data>
            <Not>false</Not>
          </ExpressionComponent>
          <ExpressionComponent xsi:type="ConditionalCall">
            <Data>
              <FullName>Boolean ReputationTagRankGreater(String, Axis, Int32)</FullName>
              <Parameters><string>Crucible</string><string>Negative</string><string>3</string></Parameters>
            </Data>
            <Not>false</Not>
          </ExpressionComponent>
        </Components>
      </ExpressionComponent>
    </Components>
  </Conditionals>
  <OnEnterScripts>
    <ScriptCall>
      <Data>
        <FullName>Void SetGlobalValue(String, Int32)</FullName>
        <Parameters><string>bMetEder</string><string>1</string></Parameters>
      </Data>
    </ScriptCall>
  </OnEnterScripts>
  <OnExitScripts />
  <OnUpdateScripts />
  <IsQuestionNode>true</IsQuestionNode>
  <PlayType>Normal</PlayType>
  <Persistence>OnceEver</Persistence>
  <DisplayType>Conversation</DisplayType>
  <SpeakerGuid>b1a7e800-5b2c-4d1f-9d8e-000000000001</SpeakerGuid>
</FlowChartNode>
<FlowChartNode xsi:type="PlayerResponseNode">
  <NodeID>1</NodeID>
  <ContainerNodeID>-1</ContainerNodeID>
  <Links />
  <Conditionals><Operator>And</Operator><Components /></Conditionals>
  <OnEnterScripts /><OnExitScripts /><OnUpdateScripts />
</FlowChartNode>"#;

    #[test]
    fn parses_nodes_links_and_guards() {
        let chart = parse_flowchart_xml(&document(GUARDED_TALK)).expect("conversation parses");
        assert_eq!(chart.next_node_id(), 9);
        assert_eq!(chart.len(), 2);

        let root = chart.get_node(0).expect("root");
        assert_eq!(root.container_node_id, None);
        assert!(root.is_question_node());
        assert_eq!(root.brief(), "[ node-00 QuestionNode OnceEver ]");
        assert_eq!(
            root.conditionals.format_guard().expect("guard"),
            "!bMetEder && (Mercenary || Rep(Crucible < -3))"
        );
        assert_eq!(root.on_enter.len(), 1);
        assert_eq!(root.on_enter[0].format().expect("action"), "bMetEder = 1");
        assert!(root.on_exit.is_empty());

        let link = &root.links[0];
        assert_eq!((link.from_node_id, link.to_node_id), (0, 1));
        assert_eq!(
            link.brief(),
            "[ PointsToGhost !PlayQuestionNodeVO RandomWeight-2 ShowAlways ]"
        );

        let response = chart.get_node(1).expect("response");
        assert!(response.is_player_response());
        assert!(response.conditionals.is_always());
    }

    #[test]
    fn parses_trigger_and_bank_nodes() {
        let nodes = r#"
<FlowChartNode xsi:type="BankNode">
  <NodeID>0</NodeID>
  <ContainerNodeID>-1</ContainerNodeID>
  <Links />
  <ChildNodeIDs><int>1</int><int>2</int></ChildNodeIDs>
</FlowChartNode>
<FlowChartNode xsi:type="TriggerConversationNode">
  <NodeID>1</NodeID>
  <ContainerNodeID>0</ContainerNodeID>
  <Links />
  <ConversationFilename>Assets/Data/Conversations/test/test_market.conversation</ConversationFilename>
  <StartNodeID>4</StartNodeID>
</FlowChartNode>
<FlowChartNode xsi:type="ScriptNode">
  <NodeID>2</NodeID>
  <ContainerNodeID>0</ContainerNodeID>
  <Links />
  <DisplayType>Hidden</DisplayType>
</FlowChartNode>"#;
        let chart = parse_flowchart_xml(&document(nodes)).expect("conversation parses");
        assert_eq!(chart.get_node(0).expect("bank").child_node_ids(), &[1, 2]);

        let trigger = chart.get_node(1).expect("trigger");
        assert_eq!(trigger.container_node_id, Some(0));
        assert_eq!(trigger.trigger_target(), Some(("test_market".to_string(), 4)));
        assert_eq!(
            chart.get_node(2).expect("script").brief(),
            "[ node-02 ScriptNode Hidden ]"
        );
        assert!(chart.validate_links().is_ok());
    }

    #[test]
    fn rejects_unknown_node_type() {
        let nodes = r#"<FlowChartNode xsi:type="CommentNode"><NodeID>0</NodeID></FlowChartNode>"#;
        let error = parse_conversation_xml(&document(nodes)).expect_err("unsupported");
        assert_eq!(
            error,
            DlgError::UnsupportedNodeType {
                type_name: "CommentNode".to_string()
            }
        );
    }

    #[test]
    fn rejects_link_with_foreign_source() {
        let nodes = r#"
<FlowChartNode xsi:type="TalkNode">
  <NodeID>3</NodeID>
  <Links>
    <FlowChartLink xsi:type="DialogueLink"><FromNodeID>2</FromNodeID><ToNodeID>1</ToNodeID></FlowChartLink>
  </Links>
</FlowChartNode>"#;
        let error = parse_conversation_xml(&document(nodes)).expect_err("mismatch");
        assert_eq!(
            error,
            DlgError::LinkSourceMismatch {
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn rejects_duplicate_ids_when_building_flowchart() {
        let nodes = r#"
<FlowChartNode xsi:type="TalkNode"><NodeID>0</NodeID></FlowChartNode>
<FlowChartNode xsi:type="ScriptNode"><NodeID>0</NodeID></FlowChartNode>"#;
        let parsed = parse_conversation_xml(&document(nodes)).expect("descriptors decode");
        assert_eq!(parsed.nodes.len(), 2);
        assert_eq!(
            parsed.into_flowchart().expect_err("duplicate"),
            DlgError::DuplicateNodeId { id: 0 }
        );
    }

    #[test]
    fn rejects_unknown_enum_text_and_wrong_root() {
        let nodes = r#"<FlowChartNode xsi:type="TalkNode"><NodeID>0</NodeID><Persistence>Forever</Persistence></FlowChartNode>"#;
        let error = parse_conversation_xml(&document(nodes)).expect_err("bad enum");
        assert!(error.to_string().contains("Forever"));

        let wrong_root = parse_conversation_xml("<StringTableFile />").expect_err("root");
        assert_eq!(wrong_root.code(), "MALFORMED_DOCUMENT");
    }
}
